use crate::types::{Submission, SubmissionStatus};
use chrono::Utc;
use scoring::ScoreMap;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Submission {0} not found")]
    NotFound(Uuid),

    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },
}

#[derive(Clone, Debug, Default)]
pub struct SubmissionFilter {
    pub dataset_id: Option<Uuid>,
    pub model_name: Option<String>,
    pub status: Option<SubmissionStatus>,
}

/// In-memory submission records. Status moves only forward and terminal
/// records are immutable; every mutation happens inside one write-lock
/// critical section, so concurrent status reads see either the old state or
/// the new one, never a half-written terminal record.
#[derive(Default)]
pub struct SubmissionStore {
    inner: RwLock<HashMap<Uuid, Submission>>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, submission: Submission) {
        self.inner.write().await.insert(submission.id, submission);
    }

    /// Snapshot read; safe to poll repeatedly while evaluation is in flight.
    pub async fn get(&self, id: Uuid) -> Option<Submission> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Filtered listing, most recent first.
    pub async fn list(&self, filter: &SubmissionFilter) -> Vec<Submission> {
        let inner = self.inner.read().await;
        let mut submissions: Vec<Submission> = inner
            .values()
            .filter(|s| filter.dataset_id.map_or(true, |id| s.dataset_id == id))
            .filter(|s| {
                filter
                    .model_name
                    .as_deref()
                    .map_or(true, |name| s.model_name == name)
            })
            .filter(|s| filter.status.map_or(true, |status| s.status == status))
            .cloned()
            .collect();
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        submissions
    }

    pub async fn completed_for(&self, dataset_id: Uuid) -> Vec<Submission> {
        self.inner
            .read()
            .await
            .values()
            .filter(|s| s.dataset_id == dataset_id && s.status == SubmissionStatus::Completed)
            .cloned()
            .collect()
    }

    pub async fn mark_processing(&self, id: Uuid) -> Result<(), StoreError> {
        self.transition(id, SubmissionStatus::Processing, |s| {
            s.status = SubmissionStatus::Processing;
        })
        .await
    }

    /// Terminal success: status and score fields change together.
    pub async fn complete(
        &self,
        id: Uuid,
        primary_score: f64,
        detailed_scores: ScoreMap,
        confidence_interval: Option<String>,
    ) -> Result<(), StoreError> {
        self.transition(id, SubmissionStatus::Completed, move |s| {
            s.status = SubmissionStatus::Completed;
            s.primary_score = Some(primary_score);
            s.detailed_scores = Some(detailed_scores);
            s.confidence_interval = confidence_interval;
            s.evaluated_at = Some(Utc::now());
        })
        .await
    }

    /// Terminal failure: the error message is the user-visible outcome.
    pub async fn fail(&self, id: Uuid, error_message: String) -> Result<(), StoreError> {
        self.transition(id, SubmissionStatus::Failed, move |s| {
            s.status = SubmissionStatus::Failed;
            s.error_message = Some(error_message);
        })
        .await
    }

    async fn transition<F>(
        &self,
        id: Uuid,
        to: SubmissionStatus,
        apply: F,
    ) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Submission),
    {
        let mut inner = self.inner.write().await;
        let submission = inner.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let allowed = match to {
            SubmissionStatus::Pending => false,
            SubmissionStatus::Processing => submission.status == SubmissionStatus::Pending,
            SubmissionStatus::Completed | SubmissionStatus::Failed => {
                submission.status == SubmissionStatus::Processing
            }
        };
        if !allowed {
            return Err(StoreError::InvalidTransition {
                from: submission.status,
                to,
            });
        }

        apply(submission);
        submission.updated_at = Utc::now();
        Ok(())
    }
}
