use scoring::{evaluate, EvalError, GroundTruthItem, Prediction, ScoreKey, TaskType};
use serde_json::{json, Value};

fn gt(id: &str, answer: Value) -> GroundTruthItem {
    GroundTruthItem {
        id: id.to_string(),
        question: None,
        answer,
    }
}

fn pred(id: &str, prediction: Value) -> Prediction {
    Prediction {
        id: id.to_string(),
        prediction,
    }
}

#[test]
fn classification_scenario_from_the_api_docs() {
    let ground_truth = vec![gt("1", json!("pos")), gt("2", json!("neg"))];
    let predictions = vec![pred("1", json!("pos")), pred("2", json!("pos"))];

    let eval = evaluate(
        TaskType::TextClassification,
        &ground_truth,
        &predictions,
        ScoreKey::Accuracy,
    )
    .unwrap();

    assert_eq!(eval.primary_score, 0.5);
    assert_eq!(eval.scores[&ScoreKey::Accuracy], 0.5);
    assert_eq!(eval.samples, vec![1.0, 0.0]);
}

#[test]
fn evaluation_is_deterministic() {
    let ground_truth = vec![
        gt("1", json!("cat")),
        gt("2", json!("dog")),
        gt("3", json!("cat")),
    ];
    let predictions = vec![
        pred("1", json!("cat")),
        pred("2", json!("cat")),
        pred("3", json!("dog")),
    ];

    let first = evaluate(
        TaskType::TextClassification,
        &ground_truth,
        &predictions,
        ScoreKey::F1,
    )
    .unwrap();
    let second = evaluate(
        TaskType::TextClassification,
        &ground_truth,
        &predictions,
        ScoreKey::F1,
    )
    .unwrap();

    assert_eq!(first.primary_score, second.primary_score);
    assert_eq!(first.scores, second.scores);
    assert_eq!(
        serde_json::to_string(&first.scores).unwrap(),
        serde_json::to_string(&second.scores).unwrap()
    );
}

#[test]
fn all_scores_stay_in_unit_range() {
    let ground_truth = vec![gt("1", json!("a")), gt("2", json!("b")), gt("3", json!("c"))];
    let predictions = vec![pred("1", json!("b")), pred("2", json!("c"))];

    let eval = evaluate(
        TaskType::TextClassification,
        &ground_truth,
        &predictions,
        ScoreKey::Accuracy,
    )
    .unwrap();

    for key in [
        ScoreKey::Accuracy,
        ScoreKey::Precision,
        ScoreKey::Recall,
        ScoreKey::F1,
        ScoreKey::MicroPrecision,
        ScoreKey::MicroRecall,
        ScoreKey::MicroF1,
    ] {
        let value = eval.scores[&key];
        assert!((0.0..=1.0).contains(&value), "{key} = {value}");
        assert!(value.is_finite());
    }
}

#[test]
fn unmatched_prediction_ids_are_ignored() {
    let ground_truth = vec![gt("1", json!("pos"))];
    let predictions = vec![pred("1", json!("pos")), pred("999", json!("neg"))];

    let eval = evaluate(
        TaskType::TextClassification,
        &ground_truth,
        &predictions,
        ScoreKey::Accuracy,
    )
    .unwrap();
    assert_eq!(eval.primary_score, 1.0);
    assert_eq!(eval.scores[&ScoreKey::TotalPredictions], 1.0);
}

#[test]
fn duplicate_prediction_ids_keep_the_last() {
    let ground_truth = vec![gt("1", json!("pos"))];
    let predictions = vec![pred("1", json!("neg")), pred("1", json!("pos"))];

    let eval = evaluate(
        TaskType::TextClassification,
        &ground_truth,
        &predictions,
        ScoreKey::Accuracy,
    )
    .unwrap();
    assert_eq!(eval.primary_score, 1.0);
}

#[test]
fn fully_unmatched_predictions_fail_instead_of_scoring_zero() {
    let ground_truth = vec![gt("1", json!("pos"))];
    let predictions = vec![pred("7", json!("pos")), pred("8", json!("neg"))];

    let err = evaluate(
        TaskType::TextClassification,
        &ground_truth,
        &predictions,
        ScoreKey::Accuracy,
    )
    .unwrap_err();
    assert!(matches!(err, EvalError::EmptyPredictionSet));
}

#[test]
fn primary_metric_must_fit_the_task() {
    let ground_truth = vec![gt("1", json!("pos"))];
    let predictions = vec![pred("1", json!("pos"))];

    let err = evaluate(
        TaskType::Retrieval,
        &ground_truth,
        &predictions,
        ScoreKey::Accuracy,
    )
    .unwrap_err();
    assert!(matches!(err, EvalError::MetricNotSelectable { .. }));
}

#[test]
fn ner_end_to_end_counts_span_mismatches() {
    let ground_truth = vec![
        gt("s1", json!([["Paris", "LOC"]])),
        gt("s2", json!([["Curie", "PER"], ["Sorbonne", "ORG"]])),
    ];
    let predictions = vec![
        pred("s1", json!([["Paris", "LOC"], ["Seine", "LOC"]])),
        pred("s2", json!([["Curie", "PER"]])),
    ];

    let eval = evaluate(
        TaskType::NamedEntityRecognition,
        &ground_truth,
        &predictions,
        ScoreKey::F1,
    )
    .unwrap();

    assert_eq!(eval.scores[&ScoreKey::TruePositives], 2.0);
    assert_eq!(eval.scores[&ScoreKey::FalsePositives], 1.0);
    assert_eq!(eval.scores[&ScoreKey::FalseNegatives], 1.0);
    // NER has no per-example decomposition.
    assert!(eval.samples.is_empty());
}

#[test]
fn document_qa_reports_both_match_styles() {
    let ground_truth = vec![
        gt("q1", json!("The Eiffel Tower")),
        gt("q2", json!(["Paris", "City of Light"])),
        gt("q3", json!("Berlin")),
    ];
    let predictions = vec![
        pred("q1", json!("eiffel tower")),
        pred("q2", json!("paris")),
        pred("q3", json!("Munich")),
    ];

    let eval = evaluate(
        TaskType::DocumentQa,
        &ground_truth,
        &predictions,
        ScoreKey::ExactMatch,
    )
    .unwrap();

    assert_eq!(eval.primary_score, 0.6667);
    assert_eq!(eval.scores[&ScoreKey::TotalQuestions], 3.0);
    assert_eq!(eval.scores[&ScoreKey::ExactMatchesCount], 2.0);
    assert_eq!(eval.samples, vec![1.0, 1.0, 0.0]);
}

#[test]
fn line_qa_uses_the_same_scoring_as_document_qa() {
    let ground_truth = vec![gt("l1", json!("42"))];
    let predictions = vec![pred("l1", json!("42"))];

    let doc = evaluate(
        TaskType::DocumentQa,
        &ground_truth,
        &predictions,
        ScoreKey::ExactMatch,
    )
    .unwrap();
    let line = evaluate(
        TaskType::LineQa,
        &ground_truth,
        &predictions,
        ScoreKey::ExactMatch,
    )
    .unwrap();
    assert_eq!(doc.scores, line.scores);
}

#[test]
fn retrieval_diagnostics_cover_every_query() {
    let ground_truth = vec![
        gt("q1", json!(["d1", "d2"])),
        gt("q2", json!("d9")),
        gt("q3", json!(["d4"])),
    ];
    let predictions = vec![
        pred("q1", json!(["d2"])),
        pred("q2", json!(["d1", "d9"])),
    ];

    let eval = evaluate(
        TaskType::Retrieval,
        &ground_truth,
        &predictions,
        ScoreKey::RetrievalAccuracy,
    )
    .unwrap();

    assert_eq!(eval.primary_score, 0.6667);
    assert_eq!(eval.scores[&ScoreKey::CorrectRetrievals], 2.0);
    assert_eq!(eval.scores[&ScoreKey::TotalQueries], 3.0);
    assert_eq!(eval.scores[&ScoreKey::FailedRetrievals], 1.0);
    assert_eq!(eval.samples, vec![1.0, 1.0, 0.0]);
}
