use chrono::{Duration as ChronoDuration, Utc};
use leaderboard_api::config::AppConfig;
use leaderboard_api::errors::ApiError;
use leaderboard_api::state::{AppState, SharedState};
use leaderboard_api::types::{Dataset, Submission, SubmissionStatus};
use scoring::{GroundTruthItem, ScoreKey, ScoreMap, TaskType};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn config_with_ttl(ttl: Duration) -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        eval_workers: 2,
        cache_ttl: ttl,
        hf_base_url: "http://127.0.0.1:9".to_string(),
    }
}

async fn seed_dataset(state: &SharedState, name: &str, task_type: TaskType) -> Uuid {
    let primary_metric = match task_type {
        TaskType::Retrieval => ScoreKey::RetrievalAccuracy,
        TaskType::DocumentQa | TaskType::LineQa => ScoreKey::ExactMatch,
        _ => ScoreKey::Accuracy,
    };
    let dataset = Dataset {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: String::new(),
        url: format!("https://example.com/{name}"),
        task_type,
        test_set_public: false,
        labels_public: false,
        primary_metric,
        additional_metrics: vec![],
        num_examples: 1,
        ground_truth: Arc::new(vec![GroundTruthItem {
            id: "1".to_string(),
            question: None,
            answer: json!("pos"),
        }]),
        created_at: Utc::now(),
    };
    let id = dataset.id;
    state.datasets.insert(dataset).await.unwrap();
    id
}

/// Insert a completed submission with a controlled score and creation time.
async fn seed_completed(
    state: &SharedState,
    dataset_id: Uuid,
    model_name: &str,
    score: f64,
    is_internal: bool,
    age_secs: i64,
) -> Uuid {
    let id = Uuid::new_v4();
    let created_at = Utc::now() - ChronoDuration::seconds(age_secs);
    let submission = Submission {
        id,
        dataset_id,
        model_name: model_name.to_string(),
        model_version: None,
        organization: None,
        is_internal,
        metadata: None,
        predictions: Arc::new(vec![]),
        status: SubmissionStatus::Pending,
        primary_score: None,
        detailed_scores: None,
        confidence_interval: None,
        error_message: None,
        created_at,
        updated_at: created_at,
        evaluated_at: None,
    };
    state.submissions.insert(submission).await;
    state.submissions.mark_processing(id).await.unwrap();
    let mut scores = ScoreMap::new();
    scores.insert(ScoreKey::Accuracy, score);
    state
        .submissions
        .complete(id, score, scores, None)
        .await
        .unwrap();
    state.leaderboard.invalidate(dataset_id).await;
    id
}

#[tokio::test]
async fn ranks_are_dense_and_ordered_by_score() {
    let (state, _rx) = AppState::new(config_with_ttl(Duration::from_secs(300)));
    let dataset_id = seed_dataset(&state, "bench", TaskType::TextClassification).await;

    seed_completed(&state, dataset_id, "bronze", 0.4, false, 30).await;
    seed_completed(&state, dataset_id, "gold", 0.9, false, 20).await;
    seed_completed(&state, dataset_id, "silver", 0.7, false, 10).await;

    let board = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();

    let names: Vec<&str> = board.entries.iter().map(|e| e.model_name.as_str()).collect();
    assert_eq!(names, vec!["gold", "silver", "bronze"]);
    let ranks: Vec<usize> = board.entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn ties_are_broken_by_earlier_submission() {
    let (state, _rx) = AppState::new(config_with_ttl(Duration::from_secs(300)));
    let dataset_id = seed_dataset(&state, "bench", TaskType::TextClassification).await;

    // Same score; "later" was created after "earlier".
    seed_completed(&state, dataset_id, "later", 0.9, false, 5).await;
    seed_completed(&state, dataset_id, "earlier", 0.9, false, 60).await;

    let board = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();

    assert_eq!(board.entries[0].model_name, "earlier");
    assert_eq!(board.entries[0].rank, 1);
    assert_eq!(board.entries[1].model_name, "later");
    assert_eq!(board.entries[1].rank, 2);
}

#[tokio::test]
async fn repeated_queries_return_identical_boards() {
    let (state, _rx) = AppState::new(config_with_ttl(Duration::from_secs(300)));
    let dataset_id = seed_dataset(&state, "bench", TaskType::TextClassification).await;
    seed_completed(&state, dataset_id, "a", 0.8, false, 10).await;
    seed_completed(&state, dataset_id, "b", 0.8, false, 5).await;
    seed_completed(&state, dataset_id, "c", 0.2, false, 1).await;

    let first = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();
    let second = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn internal_submissions_are_hidden_and_ranks_renumber() {
    let (state, _rx) = AppState::new(config_with_ttl(Duration::from_secs(300)));
    let dataset_id = seed_dataset(&state, "bench", TaskType::TextClassification).await;

    seed_completed(&state, dataset_id, "in-house", 0.95, true, 30).await;
    seed_completed(&state, dataset_id, "public-best", 0.9, false, 20).await;
    seed_completed(&state, dataset_id, "public-second", 0.5, false, 10).await;

    let with_internal = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();
    assert_eq!(with_internal.entries.len(), 3);
    assert_eq!(with_internal.entries[0].model_name, "in-house");
    assert!(with_internal.entries[0].is_internal);

    let external_only = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, false)
        .await
        .unwrap();
    assert_eq!(external_only.entries.len(), 2);
    assert_eq!(external_only.entries[0].model_name, "public-best");
    assert_eq!(external_only.entries[0].rank, 1);
    assert_eq!(external_only.entries[1].rank, 2);
    assert!(external_only.entries.iter().all(|e| !e.is_internal));
}

#[tokio::test]
async fn completions_invalidate_the_cache_immediately() {
    let (state, _rx) = AppState::new(config_with_ttl(Duration::from_secs(300)));
    let dataset_id = seed_dataset(&state, "bench", TaskType::TextClassification).await;
    seed_completed(&state, dataset_id, "first", 0.6, false, 10).await;

    let before = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();
    assert_eq!(before.entries.len(), 1);

    // A new completion must be visible on the next read despite the TTL.
    seed_completed(&state, dataset_id, "second", 0.8, false, 1).await;
    let after = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();
    assert_eq!(after.entries.len(), 2);
    assert_eq!(after.entries[0].model_name, "second");
}

#[tokio::test]
async fn cached_snapshots_are_served_until_invalidated() {
    let (state, _rx) = AppState::new(config_with_ttl(Duration::from_secs(300)));
    let dataset_id = seed_dataset(&state, "bench", TaskType::TextClassification).await;
    seed_completed(&state, dataset_id, "first", 0.6, false, 10).await;

    let cached = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();

    // Slip a completed submission into the store without bumping the
    // version: the cached snapshot keeps being served.
    let id = Uuid::new_v4();
    let now = Utc::now();
    state
        .submissions
        .insert(Submission {
            id,
            dataset_id,
            model_name: "sneaky".to_string(),
            model_version: None,
            organization: None,
            is_internal: false,
            metadata: None,
            predictions: Arc::new(vec![]),
            status: SubmissionStatus::Pending,
            primary_score: None,
            detailed_scores: None,
            confidence_interval: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            evaluated_at: None,
        })
        .await;
    state.submissions.mark_processing(id).await.unwrap();
    state
        .submissions
        .complete(id, 0.99, ScoreMap::new(), None)
        .await
        .unwrap();

    let still_cached = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();
    assert_eq!(still_cached.entries.len(), cached.entries.len());

    // Invalidation makes it visible.
    state.leaderboard.invalidate(dataset_id).await;
    let fresh = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();
    assert_eq!(fresh.entries.len(), 2);
}

#[tokio::test]
async fn zero_ttl_recomputes_every_read() {
    let (state, _rx) = AppState::new(config_with_ttl(Duration::ZERO));
    let dataset_id = seed_dataset(&state, "bench", TaskType::TextClassification).await;
    seed_completed(&state, dataset_id, "first", 0.6, false, 10).await;

    state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();

    // No invalidation, but the TTL has already expired.
    let id = Uuid::new_v4();
    let now = Utc::now();
    state
        .submissions
        .insert(Submission {
            id,
            dataset_id,
            model_name: "late".to_string(),
            model_version: None,
            organization: None,
            is_internal: false,
            metadata: None,
            predictions: Arc::new(vec![]),
            status: SubmissionStatus::Pending,
            primary_score: None,
            detailed_scores: None,
            confidence_interval: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            evaluated_at: None,
        })
        .await;
    state.submissions.mark_processing(id).await.unwrap();
    state
        .submissions
        .complete(id, 0.7, ScoreMap::new(), None)
        .await
        .unwrap();

    let board = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, dataset_id, true)
        .await
        .unwrap();
    assert_eq!(board.entries.len(), 2);
}

#[tokio::test]
async fn all_leaderboards_filter_by_task_and_skip_empty_datasets() {
    let (state, _rx) = AppState::new(config_with_ttl(Duration::from_secs(300)));
    let clf = seed_dataset(&state, "clf", TaskType::TextClassification).await;
    let qa = seed_dataset(&state, "qa", TaskType::DocumentQa).await;
    let _empty = seed_dataset(&state, "empty", TaskType::TextClassification).await;

    seed_completed(&state, clf, "model-a", 0.8, false, 10).await;
    seed_completed(&state, qa, "model-b", 0.6, false, 10).await;

    let all = state
        .leaderboard
        .get_all(&state.datasets, &state.submissions, None)
        .await;
    assert_eq!(all.len(), 2);

    let clf_only = state
        .leaderboard
        .get_all(
            &state.datasets,
            &state.submissions,
            Some(TaskType::TextClassification),
        )
        .await;
    assert_eq!(clf_only.len(), 1);
    assert_eq!(clf_only[0].dataset_id, clf);
}

#[tokio::test]
async fn unknown_dataset_is_a_not_found_error() {
    let (state, _rx) = AppState::new(config_with_ttl(Duration::from_secs(300)));
    let err = state
        .leaderboard
        .get_leaderboard(&state.datasets, &state.submissions, Uuid::new_v4(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
