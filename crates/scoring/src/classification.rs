//! Text-classification scoring: label accuracy plus macro- and
//! micro-averaged precision/recall/F1 over per-class confusion counts.

use crate::metrics::{f1, label_text, precision, recall, round4};
use crate::types::{GroundTruthItem, ScoreKey, ScoreMap};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

pub struct ClassificationOutcome {
    pub scores: ScoreMap,
    /// 1.0/0.0 per matched example, in ground-truth order. Feeds the
    /// confidence interval when accuracy is the primary metric.
    pub per_example_correct: Vec<f64>,
}

fn canon(label: &str) -> String {
    label.trim().to_lowercase()
}

pub fn evaluate(
    ground_truth: &[GroundTruthItem],
    predictions: &HashMap<&str, &Value>,
) -> ClassificationOutcome {
    let mut correct = 0u64;
    let mut total = 0u64;
    let mut per_example_correct = Vec::new();

    // Class keys are the labels as submitted; only the equality test is
    // case/whitespace-insensitive.
    let mut class_correct: BTreeMap<String, u64> = BTreeMap::new();
    let mut class_total: BTreeMap<String, u64> = BTreeMap::new();
    let mut class_pred_total: BTreeMap<String, u64> = BTreeMap::new();

    for gt in ground_truth {
        let true_label = label_text(&gt.answer);

        let Some(pred_value) = predictions.get(gt.id.as_str()) else {
            // Unpredicted rows still count against the true class, so recall
            // drops for sparse submissions. Accuracy stays over matched rows.
            *class_total.entry(true_label).or_default() += 1;
            continue;
        };

        let pred_label = label_text(pred_value);
        total += 1;
        *class_total.entry(true_label.clone()).or_default() += 1;
        *class_pred_total.entry(pred_label.clone()).or_default() += 1;

        if canon(&pred_label) == canon(&true_label) {
            correct += 1;
            *class_correct.entry(true_label).or_default() += 1;
            per_example_correct.push(1.0);
        } else {
            per_example_correct.push(0.0);
        }
    }

    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    let mut classes: Vec<String> = class_total.keys().cloned().collect();
    for label in class_pred_total.keys() {
        if !class_total.contains_key(label) {
            classes.push(label.clone());
        }
    }

    let mut precisions = Vec::with_capacity(classes.len());
    let mut recalls = Vec::with_capacity(classes.len());
    for class in &classes {
        let tp = class_correct.get(class).copied().unwrap_or(0);
        let fp = class_pred_total
            .get(class)
            .copied()
            .unwrap_or(0)
            .saturating_sub(tp);
        let fn_ = class_total
            .get(class)
            .copied()
            .unwrap_or(0)
            .saturating_sub(tp);
        precisions.push(precision(tp, fp));
        recalls.push(recall(tp, fn_));
    }

    let macro_precision = mean(&precisions);
    let macro_recall = mean(&recalls);
    let macro_f1 = f1(macro_precision, macro_recall);

    let total_tp: u64 = class_correct.values().sum();
    let total_fp = class_pred_total
        .values()
        .sum::<u64>()
        .saturating_sub(total_tp);
    let total_fn = class_total.values().sum::<u64>().saturating_sub(total_tp);

    let micro_precision = precision(total_tp, total_fp);
    let micro_recall = recall(total_tp, total_fn);
    let micro_f1 = f1(micro_precision, micro_recall);

    let mut scores = ScoreMap::new();
    scores.insert(ScoreKey::Accuracy, round4(accuracy));
    scores.insert(ScoreKey::Precision, round4(macro_precision));
    scores.insert(ScoreKey::Recall, round4(macro_recall));
    scores.insert(ScoreKey::F1, round4(macro_f1));
    scores.insert(ScoreKey::MicroPrecision, round4(micro_precision));
    scores.insert(ScoreKey::MicroRecall, round4(micro_recall));
    scores.insert(ScoreKey::MicroF1, round4(micro_f1));
    scores.insert(ScoreKey::NumClasses, classes.len() as f64);
    scores.insert(ScoreKey::TotalPredictions, total as f64);

    ClassificationOutcome {
        scores,
        per_example_correct,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
