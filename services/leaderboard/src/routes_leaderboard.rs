use crate::errors::ApiError;
use crate::state::SharedState;
use crate::types::LeaderboardView;
use axum::extract::{Path, Query, State};
use axum::Json;
use scoring::TaskType;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct AllLeaderboardsQuery {
    pub task_type: Option<String>,
}

pub async fn get_all_leaderboards(
    State(state): State<SharedState>,
    Query(query): Query<AllLeaderboardsQuery>,
) -> Result<Json<Vec<LeaderboardView>>, ApiError> {
    let task_type = query
        .task_type
        .as_deref()
        .map(|s| {
            s.parse::<TaskType>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid task_type: {s}")))
        })
        .transpose()?;

    let boards = state
        .leaderboard
        .get_all(&state.datasets, &state.submissions, task_type)
        .await;
    Ok(Json(boards))
}

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub include_internal: Option<bool>,
}

pub async fn get_dataset_leaderboard(
    State(state): State<SharedState>,
    Path(dataset_id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardView>, ApiError> {
    let board = state
        .leaderboard
        .get_leaderboard(
            &state.datasets,
            &state.submissions,
            dataset_id,
            query.include_internal.unwrap_or(true),
        )
        .await?;
    Ok(Json(board))
}
