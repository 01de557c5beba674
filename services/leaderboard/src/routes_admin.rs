use crate::errors::ApiError;
use crate::hf_import::HfImporter;
use crate::routes_datasets::SuccessResponse;
use crate::state::SharedState;
use crate::types::Dataset;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct ImportQuery {
    pub dataset_name: String,
    pub config: Option<String>,
    pub split: Option<String>,
    pub num_samples: Option<usize>,
}

pub async fn import_huggingface(
    State(state): State<SharedState>,
    Query(query): Query<ImportQuery>,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    if query.dataset_name.trim().is_empty() {
        return Err(ApiError::Validation("dataset_name is required".to_string()));
    }

    let importer = HfImporter::new(&state.config.hf_base_url);
    let imported = importer
        .import(
            &query.dataset_name,
            query.config.as_deref().unwrap_or("default"),
            query.split.as_deref().unwrap_or("test"),
            query.num_samples.unwrap_or(100),
        )
        .await?;

    let num_examples = imported.ground_truth.len();
    let dataset = Dataset {
        id: Uuid::new_v4(),
        name: imported.name.clone(),
        description: imported.description,
        url: imported.url,
        task_type: imported.task_type,
        // Imported sets stay private so the benchmark cannot be gamed.
        test_set_public: false,
        labels_public: false,
        primary_metric: imported.primary_metric,
        additional_metrics: imported.additional_metrics,
        num_examples,
        ground_truth: Arc::new(imported.ground_truth),
        created_at: Utc::now(),
    };
    let dataset_id = dataset.id;
    let task_type = dataset.task_type;
    state.datasets.insert(dataset).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            message: "Dataset imported successfully".to_string(),
            data: json!({
                "dataset_id": dataset_id,
                "name": imported.name,
                "task_type": task_type,
                "num_examples": num_examples,
            }),
        }),
    ))
}
