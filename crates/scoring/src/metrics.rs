//! Metric primitives shared by the task evaluators.
//!
//! All ratios are defined as 0.0 when their denominator is 0, so no input
//! can produce a NaN or a division fault.

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

static ARTICLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(a|an|the)\b").expect("articles pattern"));
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("non-word pattern"));

pub fn precision(true_positives: u64, false_positives: u64) -> f64 {
    let denom = true_positives + false_positives;
    if denom == 0 {
        0.0
    } else {
        true_positives as f64 / denom as f64
    }
}

pub fn recall(true_positives: u64, false_negatives: u64) -> f64 {
    let denom = true_positives + false_negatives;
    if denom == 0 {
        0.0
    } else {
        true_positives as f64 / denom as f64
    }
}

/// Harmonic mean of precision and recall; 0.0 when both are 0.
pub fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Scores are reported to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Canonical answer form: lowercase, articles removed as whole words,
/// punctuation stripped, whitespace collapsed.
pub fn normalize_answer(answer: &str) -> String {
    let lowered = answer.to_lowercase();
    let no_articles = ARTICLES.replace_all(&lowered, " ");
    let cleaned = NON_WORD.replace_all(&no_articles, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized string equality as a 0/1 score.
pub fn exact_match(prediction: &str, gold: &str) -> f64 {
    if normalize_answer(prediction) == normalize_answer(gold) {
        1.0
    } else {
        0.0
    }
}

/// Token-overlap F1 between normalized answers. Multiset overlap: repeated
/// tokens only count as many times as they appear on both sides.
pub fn token_f1(prediction: &str, gold: &str) -> f64 {
    let pred_tokens: Vec<String> = normalize_answer(prediction)
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let gold_tokens: Vec<String> = normalize_answer(gold)
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if pred_tokens.is_empty() || gold_tokens.is_empty() {
        return if pred_tokens == gold_tokens { 1.0 } else { 0.0 };
    }

    let mut gold_counts: HashMap<&str, u64> = HashMap::new();
    for token in &gold_tokens {
        *gold_counts.entry(token.as_str()).or_default() += 1;
    }

    let mut overlap = 0u64;
    for token in &pred_tokens {
        if let Some(count) = gold_counts.get_mut(token.as_str()) {
            if *count > 0 {
                *count -= 1;
                overlap += 1;
            }
        }
    }

    if overlap == 0 {
        return 0.0;
    }

    let p = overlap as f64 / pred_tokens.len() as f64;
    let r = overlap as f64 / gold_tokens.len() as f64;
    f1(p, r)
}

/// Canonical text form of a JSON scalar, used for label and document-id
/// comparison. Non-scalar values fall back to their compact JSON encoding.
pub fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
