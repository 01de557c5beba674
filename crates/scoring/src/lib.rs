//! Submission scoring for the evaluation leaderboard.
//!
//! Pure functions from (ground truth, predictions) to score maps: metric
//! primitives, one evaluator per task family, and the static metric
//! documentation catalog. No I/O and no shared state, so identical inputs
//! always produce identical scores.

pub mod catalog;
mod classification;
pub mod metrics;
mod ner;
mod qa;
mod retrieval;
mod types;

pub use types::{EvalError, GroundTruthItem, Prediction, ScoreKey, ScoreMap, TaskType};

use serde_json::Value;
use std::collections::HashMap;

pub type Result<T> = std::result::Result<T, EvalError>;

/// Result of scoring one submission against one dataset.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// Value of the dataset's primary metric; used for ranking.
    pub primary_score: f64,
    /// Primary metric, additional metrics and task diagnostics.
    pub scores: ScoreMap,
    /// Per-example decomposition of the primary metric where one exists
    /// (empty for aggregate-only metrics such as NER F1).
    pub samples: Vec<f64>,
}

/// Score `predictions` against `ground_truth` for the given task.
///
/// Prediction ids with no ground-truth counterpart are ignored; duplicate
/// prediction ids keep the last occurrence; ground-truth ids with no
/// prediction count as misses. A submission where nothing matches at all
/// fails with [`EvalError::EmptyPredictionSet`] rather than scoring zero.
pub fn evaluate(
    task: TaskType,
    ground_truth: &[GroundTruthItem],
    predictions: &[Prediction],
    primary_metric: ScoreKey,
) -> Result<Evaluation> {
    if !primary_metric.is_selectable_for(task) {
        return Err(EvalError::MetricNotSelectable {
            metric: primary_metric,
            task,
        });
    }

    let pred_map: HashMap<&str, &Value> = predictions
        .iter()
        .map(|p| (p.id.as_str(), &p.prediction))
        .collect();

    let matched = ground_truth
        .iter()
        .filter(|gt| pred_map.contains_key(gt.id.as_str()))
        .count();
    if matched == 0 {
        return Err(EvalError::EmptyPredictionSet);
    }

    let (scores, samples) = match task {
        TaskType::TextClassification => {
            let out = classification::evaluate(ground_truth, &pred_map);
            let samples = match primary_metric {
                ScoreKey::Accuracy => out.per_example_correct,
                _ => Vec::new(),
            };
            (out.scores, samples)
        }
        TaskType::NamedEntityRecognition => (ner::evaluate(ground_truth, &pred_map), Vec::new()),
        TaskType::DocumentQa | TaskType::LineQa => {
            let out = qa::evaluate(ground_truth, &pred_map);
            let samples = match primary_metric {
                ScoreKey::ExactMatch => out.exact_match_per_question,
                ScoreKey::F1 | ScoreKey::TokenF1 => out.f1_per_question,
                _ => Vec::new(),
            };
            (out.scores, samples)
        }
        TaskType::Retrieval => {
            let out = retrieval::evaluate(ground_truth, &pred_map);
            let samples = match primary_metric {
                ScoreKey::RetrievalAccuracy => out.hit_per_query,
                _ => Vec::new(),
            };
            (out.scores, samples)
        }
    };

    let primary_score = *scores
        .get(&primary_metric)
        .ok_or(EvalError::PrimaryMetricMissing(primary_metric))?;

    Ok(Evaluation {
        primary_score,
        scores,
        samples,
    })
}
