use crate::errors::ApiError;
use crate::types::Dataset;
use scoring::{GroundTruthItem, ScoreKey, TaskType};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory dataset registry. Datasets are immutable once inserted and are
/// never deleted, so readers always work from a consistent clone.
#[derive(Default)]
pub struct DatasetStore {
    inner: RwLock<HashMap<Uuid, Dataset>>,
}

/// Invariants checked before a dataset definition is accepted: the ground
/// truth must be non-empty with unique ids, and every selected metric must
/// be one the task's evaluator actually emits.
pub fn validate_definition(
    task_type: TaskType,
    primary_metric: ScoreKey,
    additional_metrics: &[ScoreKey],
    ground_truth: &[GroundTruthItem],
) -> Result<(), ApiError> {
    if ground_truth.is_empty() {
        return Err(ApiError::Validation(
            "Ground truth must contain at least one example".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(ground_truth.len());
    for item in ground_truth {
        if !seen.insert(item.id.as_str()) {
            return Err(ApiError::Validation(format!(
                "Duplicate ground-truth id: {}",
                item.id
            )));
        }
    }

    if !primary_metric.is_selectable_for(task_type) {
        return Err(ApiError::Validation(format!(
            "Metric '{primary_metric}' is not valid for task '{task_type}'"
        )));
    }
    for metric in additional_metrics {
        if !metric.is_selectable_for(task_type) {
            return Err(ApiError::Validation(format!(
                "Metric '{metric}' is not valid for task '{task_type}'"
            )));
        }
    }

    Ok(())
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a validated dataset. Names are unique across the store.
    pub async fn insert(&self, dataset: Dataset) -> Result<(), ApiError> {
        let mut inner = self.inner.write().await;
        if inner.values().any(|d| d.name == dataset.name) {
            return Err(ApiError::BadRequest(format!(
                "Dataset '{}' already exists",
                dataset.name
            )));
        }
        inner.insert(dataset.id, dataset);
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Option<Dataset> {
        self.inner.read().await.get(&id).cloned()
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.inner.read().await.contains_key(&id)
    }

    pub async fn list(&self, task_type: Option<TaskType>) -> Vec<Dataset> {
        let inner = self.inner.read().await;
        let mut datasets: Vec<Dataset> = inner
            .values()
            .filter(|d| task_type.map_or(true, |t| d.task_type == t))
            .cloned()
            .collect();
        datasets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        datasets
    }
}
