use crate::pipeline;
use crate::state::SharedState;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::info;
use uuid::Uuid;

/// Drain the evaluation queue, running up to `eval_workers` scorings at a
/// time. Each submission id is enqueued exactly once at intake, so no two
/// workers ever touch the same record.
pub async fn run_worker_loop(state: SharedState, mut rx: mpsc::UnboundedReceiver<Uuid>) {
    let permits = Arc::new(Semaphore::new(state.config.eval_workers));
    info!(workers = state.config.eval_workers, "worker_loop: started");

    while let Some(submission_id) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            // Semaphore closed only at shutdown.
            break;
        };
        let state = state.clone();
        tokio::spawn(async move {
            pipeline::evaluate_submission(&state, submission_id).await;
            drop(permit);
        });
    }

    info!("worker_loop: queue closed, exiting");
}
