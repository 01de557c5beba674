use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Task families the evaluators know how to score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    TextClassification,
    NamedEntityRecognition,
    DocumentQa,
    LineQa,
    Retrieval,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::TextClassification,
        TaskType::NamedEntityRecognition,
        TaskType::DocumentQa,
        TaskType::LineQa,
        TaskType::Retrieval,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::TextClassification => "text_classification",
            TaskType::NamedEntityRecognition => "named_entity_recognition",
            TaskType::DocumentQa => "document_qa",
            TaskType::LineQa => "line_qa",
            TaskType::Retrieval => "retrieval",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EvalError::UnknownTaskType(s.to_string()))
    }
}

/// One ground-truth example. `answer` stays a raw JSON value because its
/// shape is task-dependent: a label string, a list of acceptable answer
/// strings, a list of `[text, type]` entity pairs, or a list of document ids.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroundTruthItem {
    pub id: String,
    #[serde(default, alias = "text", skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub answer: Value,
}

/// One submitted prediction, keyed back to a ground-truth id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub prediction: Value,
}

/// Closed set of keys that may appear in a detailed score map. The wire
/// names are consumed verbatim by the leaderboard frontend, so this enum is
/// part of the external contract, not an implementation detail.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKey {
    // Scored metrics.
    Accuracy,
    Precision,
    Recall,
    F1,
    MicroPrecision,
    MicroRecall,
    MicroF1,
    ExactMatch,
    TokenF1,
    RetrievalAccuracy,
    // Diagnostic counts.
    NumClasses,
    TotalPredictions,
    TruePositives,
    FalsePositives,
    FalseNegatives,
    TotalQuestions,
    ExactMatchesCount,
    CorrectRetrievals,
    TotalQueries,
    FailedRetrievals,
}

impl ScoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreKey::Accuracy => "accuracy",
            ScoreKey::Precision => "precision",
            ScoreKey::Recall => "recall",
            ScoreKey::F1 => "f1",
            ScoreKey::MicroPrecision => "micro_precision",
            ScoreKey::MicroRecall => "micro_recall",
            ScoreKey::MicroF1 => "micro_f1",
            ScoreKey::ExactMatch => "exact_match",
            ScoreKey::TokenF1 => "token_f1",
            ScoreKey::RetrievalAccuracy => "retrieval_accuracy",
            ScoreKey::NumClasses => "num_classes",
            ScoreKey::TotalPredictions => "total_predictions",
            ScoreKey::TruePositives => "true_positives",
            ScoreKey::FalsePositives => "false_positives",
            ScoreKey::FalseNegatives => "false_negatives",
            ScoreKey::TotalQuestions => "total_questions",
            ScoreKey::ExactMatchesCount => "exact_matches_count",
            ScoreKey::CorrectRetrievals => "correct_retrievals",
            ScoreKey::TotalQueries => "total_queries",
            ScoreKey::FailedRetrievals => "failed_retrievals",
        }
    }

    /// Metrics a dataset may select as primary or additional for a task.
    /// This is exactly the set the matching evaluator emits, so validating
    /// membership at dataset creation guarantees the primary score exists.
    pub fn metrics_for(task: TaskType) -> &'static [ScoreKey] {
        match task {
            TaskType::TextClassification => &[
                ScoreKey::Accuracy,
                ScoreKey::Precision,
                ScoreKey::Recall,
                ScoreKey::F1,
                ScoreKey::MicroPrecision,
                ScoreKey::MicroRecall,
                ScoreKey::MicroF1,
            ],
            TaskType::NamedEntityRecognition => {
                &[ScoreKey::F1, ScoreKey::Precision, ScoreKey::Recall]
            }
            TaskType::DocumentQa | TaskType::LineQa => {
                &[ScoreKey::ExactMatch, ScoreKey::F1, ScoreKey::TokenF1]
            }
            TaskType::Retrieval => &[ScoreKey::RetrievalAccuracy],
        }
    }

    pub fn is_selectable_for(&self, task: TaskType) -> bool {
        Self::metrics_for(task).contains(self)
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreKey {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [ScoreKey; 20] = [
            ScoreKey::Accuracy,
            ScoreKey::Precision,
            ScoreKey::Recall,
            ScoreKey::F1,
            ScoreKey::MicroPrecision,
            ScoreKey::MicroRecall,
            ScoreKey::MicroF1,
            ScoreKey::ExactMatch,
            ScoreKey::TokenF1,
            ScoreKey::RetrievalAccuracy,
            ScoreKey::NumClasses,
            ScoreKey::TotalPredictions,
            ScoreKey::TruePositives,
            ScoreKey::FalsePositives,
            ScoreKey::FalseNegatives,
            ScoreKey::TotalQuestions,
            ScoreKey::ExactMatchesCount,
            ScoreKey::CorrectRetrievals,
            ScoreKey::TotalQueries,
            ScoreKey::FailedRetrievals,
        ];
        ALL.into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EvalError::UnknownMetric(s.to_string()))
    }
}

/// Detailed scores keyed by the closed key set. BTreeMap keeps serialization
/// order deterministic, which makes repeated evaluations byte-identical.
pub type ScoreMap = BTreeMap<ScoreKey, f64>;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Unknown task type: {0}")]
    UnknownTaskType(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Metric '{metric}' is not available for task '{task}'")]
    MetricNotSelectable { metric: ScoreKey, task: TaskType },

    #[error("No predictions matched any ground-truth id")]
    EmptyPredictionSet,

    #[error("Primary metric '{0}' not found in evaluation results")]
    PrimaryMetricMissing(ScoreKey),
}
