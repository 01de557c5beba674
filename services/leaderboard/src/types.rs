use chrono::{DateTime, Utc};
use scoring::{GroundTruthItem, Prediction, ScoreKey, ScoreMap, TaskType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// A benchmark dataset. Immutable once created; ground truth is shared
/// read-only with the evaluation workers.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub url: String,
    pub task_type: TaskType,
    pub test_set_public: bool,
    pub labels_public: bool,
    pub primary_metric: ScoreKey,
    pub additional_metrics: Vec<ScoreKey>,
    pub num_examples: usize,
    pub ground_truth: Arc<Vec<GroundTruthItem>>,
    pub created_at: DateTime<Utc>,
}

/// Submission lifecycle. Transitions are one-directional:
/// pending -> processing -> completed | failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Processing => "processing",
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Completed | SubmissionStatus::Failed)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "processing" => Ok(SubmissionStatus::Processing),
            "completed" => Ok(SubmissionStatus::Completed),
            "failed" => Ok(SubmissionStatus::Failed),
            other => Err(format!("Invalid status: {other}")),
        }
    }
}

/// One model submission. Owned by the pipeline: created at intake, mutated
/// only through the store's guarded transitions, never deleted.
#[derive(Clone, Debug)]
pub struct Submission {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub model_name: String,
    pub model_version: Option<String>,
    pub organization: Option<String>,
    pub is_internal: bool,
    pub metadata: Option<Value>,
    pub predictions: Arc<Vec<Prediction>>,
    pub status: SubmissionStatus,
    pub primary_score: Option<f64>,
    pub detailed_scores: Option<ScoreMap>,
    pub confidence_interval: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub evaluated_at: Option<DateTime<Utc>>,
}

/// Derived ranking row. Never persisted; recomputed from completed
/// submissions on demand.
#[derive(Clone, Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub model_name: String,
    pub score: f64,
    pub confidence_interval: Option<String>,
    pub updated_at: String,
    pub is_internal: bool,
    pub submission_id: Uuid,
}

#[derive(Clone, Debug, Serialize)]
pub struct LeaderboardView {
    pub dataset_id: Uuid,
    pub dataset_name: String,
    pub task_type: TaskType,
    pub url: String,
    pub primary_metric: ScoreKey,
    pub entries: Vec<LeaderboardEntry>,
}
