use crate::config::AppConfig;
use crate::dataset_store::DatasetStore;
use crate::leaderboard::LeaderboardEngine;
use crate::submission_store::SubmissionStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: AppConfig,
    pub datasets: DatasetStore,
    pub submissions: SubmissionStore,
    pub leaderboard: LeaderboardEngine,
    eval_tx: mpsc::UnboundedSender<Uuid>,
}

impl AppState {
    /// Build the shared state plus the receiving end of the evaluation
    /// queue, which the worker loop consumes.
    pub fn new(config: AppConfig) -> (SharedState, mpsc::UnboundedReceiver<Uuid>) {
        let (eval_tx, eval_rx) = mpsc::unbounded_channel();
        let leaderboard = LeaderboardEngine::new(config.cache_ttl);
        let state = Arc::new(Self {
            config,
            datasets: DatasetStore::new(),
            submissions: SubmissionStore::new(),
            leaderboard,
            eval_tx,
        });
        (state, eval_rx)
    }

    /// Hand a pending submission to the background workers. Intake already
    /// persisted the record, so a closed queue only delays evaluation.
    pub fn enqueue_evaluation(&self, submission_id: Uuid) {
        if self.eval_tx.send(submission_id).is_err() {
            warn!(submission_id=%submission_id, "evaluation queue closed; submission stays pending");
        }
    }
}
