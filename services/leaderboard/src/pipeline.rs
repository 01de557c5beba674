//! The submission pipeline: synchronous validating intake, asynchronous
//! evaluation, atomic terminal transitions.

use crate::errors::ApiError;
use crate::state::SharedState;
use crate::types::{Submission, SubmissionStatus};
use chrono::Utc;
use scoring::Prediction;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct NewSubmission {
    pub dataset_id: Uuid,
    pub model_name: String,
    pub model_version: Option<String>,
    pub organization: Option<String>,
    pub is_internal: bool,
    pub metadata: Option<Value>,
    pub predictions: Vec<Prediction>,
}

/// Validate and persist a submission, then hand it to the workers. Returns
/// the id immediately; scoring happens off the request path.
pub async fn intake(state: &SharedState, new: NewSubmission) -> Result<Uuid, ApiError> {
    if !state.datasets.contains(new.dataset_id).await {
        return Err(ApiError::dataset_not_found());
    }
    if new.predictions.is_empty() {
        return Err(ApiError::Validation("No predictions provided".to_string()));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    let submission = Submission {
        id,
        dataset_id: new.dataset_id,
        model_name: new.model_name,
        model_version: new.model_version,
        organization: new.organization,
        is_internal: new.is_internal,
        metadata: new.metadata,
        predictions: Arc::new(new.predictions),
        status: SubmissionStatus::Pending,
        primary_score: None,
        detailed_scores: None,
        confidence_interval: None,
        error_message: None,
        created_at: now,
        updated_at: now,
        evaluated_at: None,
    };

    let dataset_id = submission.dataset_id;
    let model_name = submission.model_name.clone();
    state.submissions.insert(submission).await;
    state.enqueue_evaluation(id);

    info!(submission_id=%id, dataset_id=%dataset_id, model=%model_name, "submission accepted");
    Ok(id)
}

/// Score one submission. Every failure mode ends in the record's `failed`
/// state with a readable message; nothing propagates past this function.
pub async fn evaluate_submission(state: &SharedState, submission_id: Uuid) {
    let Some(submission) = state.submissions.get(submission_id).await else {
        warn!(submission_id=%submission_id, "worker: unknown submission id");
        return;
    };

    if let Err(e) = state.submissions.mark_processing(submission_id).await {
        warn!(submission_id=%submission_id, "worker: not starting evaluation: {e}");
        return;
    }

    let Some(dataset) = state.datasets.get(submission.dataset_id).await else {
        let _ = state
            .submissions
            .fail(
                submission_id,
                format!("Dataset {} not found", submission.dataset_id),
            )
            .await;
        return;
    };

    // Scoring works on shared snapshots; no store lock is held while the
    // evaluation runs, so status polls stay responsive.
    let ground_truth = dataset.ground_truth.clone();
    let predictions = submission.predictions.clone();
    let task = dataset.task_type;
    let primary_metric = dataset.primary_metric;

    let outcome = tokio::task::spawn_blocking(move || {
        scoring::evaluate(task, &ground_truth, &predictions, primary_metric)
    })
    .await;

    match outcome {
        Ok(Ok(eval)) => {
            let ci = confidence_interval(&eval.samples);
            match state
                .submissions
                .complete(submission_id, eval.primary_score, eval.scores, ci)
                .await
            {
                Ok(()) => {
                    info!(
                        submission_id=%submission_id,
                        dataset_id=%dataset.id,
                        model=%submission.model_name,
                        metric=%primary_metric,
                        score=eval.primary_score,
                        "evaluation completed"
                    );
                    state.leaderboard.invalidate(dataset.id).await;
                }
                Err(e) => {
                    warn!(submission_id=%submission_id, "worker: completion rejected: {e}")
                }
            }
        }
        Ok(Err(eval_err)) => {
            warn!(submission_id=%submission_id, "evaluation failed: {eval_err}");
            let _ = state
                .submissions
                .fail(submission_id, eval_err.to_string())
                .await;
        }
        Err(join_err) => {
            error!(submission_id=%submission_id, "evaluation task aborted: {join_err}");
            let _ = state
                .submissions
                .fail(submission_id, "Evaluation task aborted".to_string())
                .await;
        }
    }
}

/// 95% normal-approximation interval over per-example scores, formatted as
/// the leaderboard displays it. None when there is nothing to aggregate.
pub fn confidence_interval(samples: &[f64]) -> Option<String> {
    if samples.len() < 2 {
        return None;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_err = (variance / n).sqrt();
    let half_width = 1.96 * std_err;

    let lo = (mean - half_width).max(0.0);
    let hi = (mean + half_width).min(1.0);
    Some(format!("{lo:.2} - {hi:.2}"))
}
