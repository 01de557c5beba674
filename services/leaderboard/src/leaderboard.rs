use crate::dataset_store::DatasetStore;
use crate::errors::ApiError;
use crate::submission_store::SubmissionStore;
use crate::types::{Dataset, LeaderboardEntry, LeaderboardView};
use scoring::TaskType;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

struct CachedBoard {
    version: u64,
    stored_at: Instant,
    board: LeaderboardView,
}

/// Ranked views over completed submissions, cached per
/// (dataset, internal-visibility) pair.
///
/// Every cache entry carries the dataset's version stamp at computation
/// time. Submission completions bump the stamp, so a newly completed
/// submission is visible on the next read regardless of remaining TTL, and
/// a slow recomputation can never overwrite a fresher invalidation
/// (store-if-version-unchanged below).
pub struct LeaderboardEngine {
    ttl: Duration,
    versions: RwLock<HashMap<Uuid, u64>>,
    cache: RwLock<HashMap<(Uuid, bool), CachedBoard>>,
}

impl LeaderboardEngine {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            versions: RwLock::new(HashMap::new()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Drop both visibility variants for a dataset by bumping its stamp.
    pub async fn invalidate(&self, dataset_id: Uuid) {
        let mut versions = self.versions.write().await;
        *versions.entry(dataset_id).or_insert(0) += 1;
    }

    async fn version_of(&self, dataset_id: Uuid) -> u64 {
        self.versions
            .read()
            .await
            .get(&dataset_id)
            .copied()
            .unwrap_or(0)
    }

    pub async fn get_leaderboard(
        &self,
        datasets: &DatasetStore,
        submissions: &SubmissionStore,
        dataset_id: Uuid,
        include_internal: bool,
    ) -> Result<LeaderboardView, ApiError> {
        let dataset = datasets
            .get(dataset_id)
            .await
            .ok_or_else(ApiError::dataset_not_found)?;

        let key = (dataset_id, include_internal);
        let version = self.version_of(dataset_id).await;

        if let Some(cached) = self.cache.read().await.get(&key) {
            if cached.version == version && cached.stored_at.elapsed() < self.ttl {
                debug!(dataset_id=%dataset_id, include_internal, "leaderboard cache hit");
                return Ok(cached.board.clone());
            }
        }

        debug!(dataset_id=%dataset_id, include_internal, "leaderboard cache miss");
        let board = build_board(&dataset, submissions, include_internal).await;

        // Only cache if no invalidation raced the recomputation.
        if self.version_of(dataset_id).await == version {
            self.cache.write().await.insert(
                key,
                CachedBoard {
                    version,
                    stored_at: Instant::now(),
                    board: board.clone(),
                },
            );
        }

        Ok(board)
    }

    /// One view per dataset that has at least one completed submission.
    pub async fn get_all(
        &self,
        datasets: &DatasetStore,
        submissions: &SubmissionStore,
        task_type: Option<TaskType>,
    ) -> Vec<LeaderboardView> {
        let mut boards = Vec::new();
        for dataset in datasets.list(task_type).await {
            if let Ok(board) = self
                .get_leaderboard(datasets, submissions, dataset.id, true)
                .await
            {
                if !board.entries.is_empty() {
                    boards.push(board);
                }
            }
        }
        boards
    }
}

async fn build_board(
    dataset: &Dataset,
    submissions: &SubmissionStore,
    include_internal: bool,
) -> LeaderboardView {
    let mut completed = submissions.completed_for(dataset.id).await;
    if !include_internal {
        completed.retain(|s| !s.is_internal);
    }

    // Best score first; equal scores resolved by earlier submission, then
    // id, so repeated queries return identical orderings.
    completed.sort_by(|a, b| {
        b.primary_score
            .unwrap_or(f64::NEG_INFINITY)
            .total_cmp(&a.primary_score.unwrap_or(f64::NEG_INFINITY))
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let entries = completed
        .into_iter()
        .enumerate()
        .map(|(i, s)| LeaderboardEntry {
            rank: i + 1,
            model_name: s.model_name,
            score: s.primary_score.unwrap_or(0.0),
            confidence_interval: s.confidence_interval,
            updated_at: s
                .evaluated_at
                .map(|t| t.format("%b %Y").to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            is_internal: s.is_internal,
            submission_id: s.id,
        })
        .collect();

    LeaderboardView {
        dataset_id: dataset.id,
        dataset_name: dataset.name.clone(),
        task_type: dataset.task_type,
        url: dataset.url.clone(),
        primary_metric: dataset.primary_metric,
        entries,
    }
}
