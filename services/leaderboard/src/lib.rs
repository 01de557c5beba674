pub mod config;
pub mod dataset_store;
pub mod errors;
pub mod hf_import;
pub mod leaderboard;
pub mod pipeline;
pub mod routes_admin;
pub mod routes_datasets;
pub mod routes_leaderboard;
pub mod routes_metrics;
pub mod routes_submissions;
pub mod state;
pub mod submission_store;
pub mod types;
pub mod worker_loop;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

pub fn router(state: state::SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/datasets",
            post(routes_datasets::create_dataset).get(routes_datasets::list_datasets),
        )
        .route("/api/datasets/:id", get(routes_datasets::get_dataset))
        .route(
            "/api/datasets/:id/questions",
            get(routes_datasets::get_dataset_questions),
        )
        .route(
            "/api/submissions",
            post(routes_submissions::create_submission).get(routes_submissions::list_submissions),
        )
        .route(
            "/api/submissions/:id",
            get(routes_submissions::get_submission),
        )
        .route(
            "/api/leaderboard",
            get(routes_leaderboard::get_all_leaderboards),
        )
        .route(
            "/api/leaderboard/:dataset_id",
            get(routes_leaderboard::get_dataset_leaderboard),
        )
        .route(
            "/api/metrics/task/:task_type",
            get(routes_metrics::get_task_metrics),
        )
        .route("/api/metrics/:metric_name", get(routes_metrics::get_metric))
        .route(
            "/api/admin/import-huggingface",
            post(routes_admin::import_huggingface),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "leaderboard-api" }))
}
