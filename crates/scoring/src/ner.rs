//! Named-entity recognition scoring: span-level exact match of
//! (text, type) entities via set differences against the gold spans.

use crate::metrics::{f1, label_text, precision, recall, round4};
use crate::types::{GroundTruthItem, ScoreKey, ScoreMap};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

// Joins span components with a separator that cannot appear in trimmed text.
const SPAN_SEP: char = '\u{1f}';

fn canon_entity(entity: &Value) -> String {
    match entity {
        Value::Array(parts) => parts
            .iter()
            .map(|p| label_text(p).trim().to_string())
            .collect::<Vec<_>>()
            .join(&SPAN_SEP.to_string()),
        other => label_text(other).trim().to_string(),
    }
}

fn entity_set(value: &Value) -> HashSet<String> {
    match value {
        Value::Array(entities) => entities.iter().map(canon_entity).collect(),
        Value::Null => HashSet::new(),
        single => std::iter::once(canon_entity(single)).collect(),
    }
}

pub fn evaluate(
    ground_truth: &[GroundTruthItem],
    predictions: &HashMap<&str, &Value>,
) -> ScoreMap {
    let mut total_tp = 0u64;
    let mut total_fp = 0u64;
    let mut total_fn = 0u64;

    for gt in ground_truth {
        let true_entities = entity_set(&gt.answer);

        let Some(pred_value) = predictions.get(gt.id.as_str()) else {
            total_fn += true_entities.len() as u64;
            continue;
        };
        let pred_entities = entity_set(pred_value);

        total_tp += true_entities.intersection(&pred_entities).count() as u64;
        total_fp += pred_entities.difference(&true_entities).count() as u64;
        total_fn += true_entities.difference(&pred_entities).count() as u64;
    }

    let p = precision(total_tp, total_fp);
    let r = recall(total_tp, total_fn);

    let mut scores = ScoreMap::new();
    scores.insert(ScoreKey::Precision, round4(p));
    scores.insert(ScoreKey::Recall, round4(r));
    scores.insert(ScoreKey::F1, round4(f1(p, r)));
    scores.insert(ScoreKey::TruePositives, total_tp as f64);
    scores.insert(ScoreKey::FalsePositives, total_fp as f64);
    scores.insert(ScoreKey::FalseNegatives, total_fn as f64);
    scores
}
