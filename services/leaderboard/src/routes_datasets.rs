use crate::dataset_store::validate_definition;
use crate::errors::ApiError;
use crate::state::SharedState;
use crate::types::Dataset;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use scoring::{GroundTruthItem, ScoreKey, TaskType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct DatasetCreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    pub task_type: TaskType,
    #[serde(default)]
    pub test_set_public: bool,
    #[serde(default)]
    pub labels_public: bool,
    pub primary_metric: ScoreKey,
    #[serde(default)]
    pub additional_metrics: Vec<ScoreKey>,
    #[serde(default)]
    pub num_examples: Option<usize>,
    pub ground_truth: Vec<GroundTruthItem>,
}

#[derive(Serialize, Debug)]
pub struct SuccessResponse {
    pub message: String,
    pub data: Value,
}

/// Public projection of a dataset. Ground-truth answers are never exposed
/// here; questions are inlined only for public test sets.
#[derive(Serialize)]
pub struct DatasetPublic {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub url: String,
    pub task_type: TaskType,
    pub test_set_public: bool,
    pub primary_metric: ScoreKey,
    pub num_examples: usize,
    pub questions: Option<Vec<Value>>,
}

fn public_view(dataset: &Dataset) -> DatasetPublic {
    let questions = dataset.test_set_public.then(|| {
        dataset
            .ground_truth
            .iter()
            .map(|item| json!({ "id": item.id, "question": item.question }))
            .collect()
    });

    DatasetPublic {
        id: dataset.id,
        name: dataset.name.clone(),
        description: dataset.description.clone(),
        url: dataset.url.clone(),
        task_type: dataset.task_type,
        test_set_public: dataset.test_set_public,
        primary_metric: dataset.primary_metric,
        num_examples: dataset.num_examples,
        questions,
    }
}

pub async fn create_dataset(
    State(state): State<SharedState>,
    Json(req): Json<DatasetCreateRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    validate_definition(
        req.task_type,
        req.primary_metric,
        &req.additional_metrics,
        &req.ground_truth,
    )?;

    // Additional metrics behave as an ordered set.
    let mut additional_metrics = Vec::with_capacity(req.additional_metrics.len());
    for metric in req.additional_metrics {
        if !additional_metrics.contains(&metric) {
            additional_metrics.push(metric);
        }
    }

    let dataset = Dataset {
        id: Uuid::new_v4(),
        name: req.name.clone(),
        description: req.description,
        url: req.url,
        task_type: req.task_type,
        test_set_public: req.test_set_public,
        labels_public: req.labels_public,
        primary_metric: req.primary_metric,
        additional_metrics,
        num_examples: req.num_examples.unwrap_or(req.ground_truth.len()),
        ground_truth: Arc::new(req.ground_truth),
        created_at: Utc::now(),
    };
    let dataset_id = dataset.id;
    state.datasets.insert(dataset).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse {
            message: "Dataset created successfully".to_string(),
            data: json!({ "dataset_id": dataset_id, "name": req.name }),
        }),
    ))
}

#[derive(Deserialize)]
pub struct DatasetListQuery {
    pub task_type: Option<String>,
}

fn parse_task_type(raw: Option<&str>) -> Result<Option<TaskType>, ApiError> {
    raw.map(|s| {
        s.parse::<TaskType>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid task_type: {s}")))
    })
    .transpose()
}

pub async fn list_datasets(
    State(state): State<SharedState>,
    Query(query): Query<DatasetListQuery>,
) -> Result<Json<Vec<DatasetPublic>>, ApiError> {
    let task_type = parse_task_type(query.task_type.as_deref())?;
    let datasets = state.datasets.list(task_type).await;
    Ok(Json(datasets.iter().map(public_view).collect()))
}

pub async fn get_dataset(
    State(state): State<SharedState>,
    Path(dataset_id): Path<Uuid>,
) -> Result<Json<DatasetPublic>, ApiError> {
    let dataset = state
        .datasets
        .get(dataset_id)
        .await
        .ok_or_else(ApiError::dataset_not_found)?;
    Ok(Json(public_view(&dataset)))
}

/// Question ids for building a submission against a private test set.
/// Question text appears only for public test sets, answers only when the
/// labels themselves are public.
pub async fn get_dataset_questions(
    State(state): State<SharedState>,
    Path(dataset_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let dataset = state
        .datasets
        .get(dataset_id)
        .await
        .ok_or_else(ApiError::dataset_not_found)?;

    let questions: Vec<Value> = dataset
        .ground_truth
        .iter()
        .map(|item| {
            let mut entry = json!({ "id": item.id });
            if dataset.test_set_public {
                entry["question"] = json!(item.question);
            }
            if dataset.labels_public {
                entry["answer"] = item.answer.clone();
            }
            entry
        })
        .collect();

    Ok(Json(json!({
        "dataset_id": dataset.id,
        "num_examples": dataset.num_examples,
        "questions": questions,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::state::AppState;
    use std::time::Duration;

    fn test_state() -> SharedState {
        let (state, _rx) = AppState::new(AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            eval_workers: 1,
            cache_ttl: Duration::from_secs(300),
            hf_base_url: "http://127.0.0.1:9".to_string(),
        });
        state
    }

    fn create_request(name: &str, test_set_public: bool, labels_public: bool) -> DatasetCreateRequest {
        DatasetCreateRequest {
            name: name.to_string(),
            description: "demo".to_string(),
            url: String::new(),
            task_type: TaskType::TextClassification,
            test_set_public,
            labels_public,
            primary_metric: ScoreKey::Accuracy,
            additional_metrics: vec![ScoreKey::F1, ScoreKey::F1],
            num_examples: None,
            ground_truth: vec![
                GroundTruthItem {
                    id: "1".to_string(),
                    question: Some("is this good?".to_string()),
                    answer: json!("pos"),
                },
                GroundTruthItem {
                    id: "2".to_string(),
                    question: Some("is this bad?".to_string()),
                    answer: json!("neg"),
                },
            ],
        }
    }

    async fn created_id(state: &SharedState, req: DatasetCreateRequest) -> Uuid {
        let (status, Json(body)) = create_dataset(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        body.data["dataset_id"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn private_test_sets_expose_ids_but_not_questions_or_answers() {
        let state = test_state();
        let id = created_id(&state, create_request("private", false, false)).await;

        let Json(listing) = list_datasets(
            State(state.clone()),
            Query(DatasetListQuery { task_type: None }),
        )
        .await
        .unwrap();
        assert_eq!(listing.len(), 1);
        assert!(listing[0].questions.is_none());
        // Duplicate additional metric collapsed.
        let dataset = state.datasets.get(id).await.unwrap();
        assert_eq!(dataset.additional_metrics, vec![ScoreKey::F1]);

        let Json(body) = get_dataset_questions(State(state.clone()), Path(id))
            .await
            .unwrap();
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0], json!({ "id": "1" }));
    }

    #[tokio::test]
    async fn public_test_sets_inline_questions_without_answers() {
        let state = test_state();
        let id = created_id(&state, create_request("public", true, false)).await;

        let Json(detail) = get_dataset(State(state.clone()), Path(id)).await.unwrap();
        let questions = detail.questions.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0]["question"], json!("is this good?"));
        assert!(questions[0].get("answer").is_none());

        let Json(body) = get_dataset_questions(State(state.clone()), Path(id))
            .await
            .unwrap();
        let first = &body["questions"].as_array().unwrap()[0];
        assert_eq!(first["question"], json!("is this good?"));
        assert!(first.get("answer").is_none());
    }

    #[tokio::test]
    async fn public_labels_expose_answers() {
        let state = test_state();
        let id = created_id(&state, create_request("open", true, true)).await;

        let Json(body) = get_dataset_questions(State(state.clone()), Path(id))
            .await
            .unwrap();
        let first = &body["questions"].as_array().unwrap()[0];
        assert_eq!(first["answer"], json!("pos"));
    }

    #[tokio::test]
    async fn invalid_definitions_are_rejected() {
        let state = test_state();

        let mut bad_metric = create_request("bad", false, false);
        bad_metric.primary_metric = ScoreKey::RetrievalAccuracy;
        let err = create_dataset(State(state.clone()), Json(bad_metric))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let mut empty = create_request("empty", false, false);
        empty.ground_truth.clear();
        let err = create_dataset(State(state.clone()), Json(empty))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        created_id(&state, create_request("dup", false, false)).await;
        let err = create_dataset(State(state), Json(create_request("dup", false, false)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
