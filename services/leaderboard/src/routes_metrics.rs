use crate::errors::ApiError;
use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::Json;
use scoring::catalog;
use scoring::TaskType;
use serde_json::{json, Value};

pub async fn get_metric(
    State(_state): State<SharedState>,
    Path(metric_name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut info = catalog::metric_info(&metric_name).ok_or_else(ApiError::metric_not_found)?;
    info["id"] = json!(metric_name);
    Ok(Json(info))
}

pub async fn get_task_metrics(
    State(_state): State<SharedState>,
    Path(task_type): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let task = task_type
        .parse::<TaskType>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid task_type: {task_type}")))?;

    let metrics: Vec<Value> = catalog::metrics_for_task(task)
        .iter()
        .filter_map(|id| {
            catalog::metric_info(id).map(|mut info| {
                info["id"] = json!(id);
                info
            })
        })
        .collect();

    Ok(Json(json!({
        "task_type": task,
        "metrics": metrics,
    })))
}
