use crate::errors::ApiError;
use crate::pipeline::{self, NewSubmission};
use crate::state::SharedState;
use crate::submission_store::SubmissionFilter;
use crate::types::{Submission, SubmissionStatus};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use scoring::{Prediction, ScoreMap};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::routes_datasets::SuccessResponse;

#[derive(Deserialize)]
pub struct SubmissionCreateRequest {
    pub dataset_id: Uuid,
    pub model_name: String,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default, alias = "submission_metadata")]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub model_name: String,
    pub model_version: Option<String>,
    pub organization: Option<String>,
    pub status: SubmissionStatus,
    pub primary_score: Option<f64>,
    pub detailed_scores: Option<ScoreMap>,
    pub confidence_interval: Option<String>,
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
    pub evaluated_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            dataset_id: s.dataset_id,
            model_name: s.model_name,
            model_version: s.model_version,
            organization: s.organization,
            status: s.status,
            primary_score: s.primary_score,
            detailed_scores: s.detailed_scores,
            confidence_interval: s.confidence_interval,
            is_internal: s.is_internal,
            created_at: s.created_at,
            evaluated_at: s.evaluated_at,
            error_message: s.error_message,
        }
    }
}

pub async fn create_submission(
    State(state): State<SharedState>,
    Json(req): Json<SubmissionCreateRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    let submission_id = pipeline::intake(
        &state,
        NewSubmission {
            dataset_id: req.dataset_id,
            model_name: req.model_name,
            model_version: req.model_version,
            organization: req.organization,
            is_internal: req.is_internal,
            metadata: req.metadata,
            predictions: req.predictions,
        },
    )
    .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SuccessResponse {
            message: "Submission received and queued for evaluation".to_string(),
            data: json!({
                "submission_id": submission_id,
                "status": "pending",
                "check_status_url": format!("/api/submissions/{submission_id}"),
            }),
        }),
    ))
}

pub async fn get_submission(
    State(state): State<SharedState>,
    Path(submission_id): Path<Uuid>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = state
        .submissions
        .get(submission_id)
        .await
        .ok_or_else(ApiError::submission_not_found)?;
    Ok(Json(submission.into()))
}

#[derive(Deserialize)]
pub struct SubmissionListQuery {
    pub dataset_id: Option<Uuid>,
    pub model_name: Option<String>,
    pub status: Option<String>,
}

pub async fn list_submissions(
    State(state): State<SharedState>,
    Query(query): Query<SubmissionListQuery>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(|s| s.parse::<SubmissionStatus>().map_err(ApiError::BadRequest))
        .transpose()?;

    let submissions = state
        .submissions
        .list(&SubmissionFilter {
            dataset_id: query.dataset_id,
            model_name: query.model_name,
            status,
        })
        .await;

    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}
