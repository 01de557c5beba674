//! Question-answering scoring, shared by document- and line-level QA:
//! normalized exact match and token-overlap F1 per question, best score
//! over multiple acceptable answers.

use crate::metrics::{exact_match, label_text, round4, token_f1};
use crate::types::{GroundTruthItem, ScoreKey, ScoreMap};
use serde_json::Value;
use std::collections::HashMap;

pub struct QaOutcome {
    pub scores: ScoreMap,
    pub exact_match_per_question: Vec<f64>,
    pub f1_per_question: Vec<f64>,
}

fn acceptable_answers(answer: &Value) -> Vec<String> {
    match answer {
        Value::Array(values) => values.iter().map(label_text).collect(),
        single => vec![label_text(single)],
    }
}

pub fn evaluate(ground_truth: &[GroundTruthItem], predictions: &HashMap<&str, &Value>) -> QaOutcome {
    let mut em_scores = Vec::with_capacity(ground_truth.len());
    let mut f1_scores = Vec::with_capacity(ground_truth.len());

    for gt in ground_truth {
        let Some(pred_value) = predictions.get(gt.id.as_str()) else {
            em_scores.push(0.0);
            f1_scores.push(0.0);
            continue;
        };
        let pred_answer = label_text(pred_value);
        let answers = acceptable_answers(&gt.answer);

        let em = answers
            .iter()
            .map(|gold| exact_match(&pred_answer, gold))
            .fold(0.0f64, f64::max);
        let f1 = answers
            .iter()
            .map(|gold| token_f1(&pred_answer, gold))
            .fold(0.0f64, f64::max);

        em_scores.push(em);
        f1_scores.push(f1);
    }

    let avg_em = mean(&em_scores);
    let avg_f1 = mean(&f1_scores);

    let mut scores = ScoreMap::new();
    scores.insert(ScoreKey::ExactMatch, round4(avg_em));
    scores.insert(ScoreKey::F1, round4(avg_f1));
    // Alias the frontend shows next to exact match.
    scores.insert(ScoreKey::TokenF1, round4(avg_f1));
    scores.insert(ScoreKey::TotalQuestions, em_scores.len() as f64);
    scores.insert(ScoreKey::ExactMatchesCount, em_scores.iter().sum());

    QaOutcome {
        scores,
        exact_match_per_question: em_scores,
        f1_per_question: f1_scores,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
