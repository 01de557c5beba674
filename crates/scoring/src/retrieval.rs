//! Retrieval scoring: a query counts as a hit when any predicted document
//! id appears in the gold id list.

use crate::metrics::{label_text, round4};
use crate::types::{GroundTruthItem, ScoreKey, ScoreMap};
use serde_json::Value;
use std::collections::HashMap;

pub struct RetrievalOutcome {
    pub scores: ScoreMap,
    pub hit_per_query: Vec<f64>,
}

fn doc_ids(value: &Value) -> Vec<String> {
    match value {
        Value::Array(values) => values.iter().map(label_text).collect(),
        single => vec![label_text(single)],
    }
}

pub fn evaluate(
    ground_truth: &[GroundTruthItem],
    predictions: &HashMap<&str, &Value>,
) -> RetrievalOutcome {
    let mut correct = 0u64;
    let mut total = 0u64;
    let mut hit_per_query = Vec::with_capacity(ground_truth.len());

    for gt in ground_truth {
        let gold = doc_ids(&gt.answer);
        total += 1;

        let Some(pred_value) = predictions.get(gt.id.as_str()) else {
            hit_per_query.push(0.0);
            continue;
        };
        let predicted = doc_ids(pred_value);

        if predicted.iter().any(|id| gold.contains(id)) {
            correct += 1;
            hit_per_query.push(1.0);
        } else {
            hit_per_query.push(0.0);
        }
    }

    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    let mut scores = ScoreMap::new();
    scores.insert(ScoreKey::RetrievalAccuracy, round4(accuracy));
    scores.insert(ScoreKey::CorrectRetrievals, correct as f64);
    scores.insert(ScoreKey::TotalQueries, total as f64);
    scores.insert(ScoreKey::FailedRetrievals, (total - correct) as f64);

    RetrievalOutcome {
        scores,
        hit_per_query,
    }
}
