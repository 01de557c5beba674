//! Bulk dataset import from the HuggingFace datasets-server.
//!
//! Fetches sample rows, maps well-known datasets to task types, and
//! converts rows to ground truth by probing the common field names.

use crate::errors::ApiError;
use scoring::{GroundTruthItem, ScoreKey, TaskType};
use serde_json::Value;
use std::time::Duration;
use tracing::info;

const QUESTION_MAX_CHARS: usize = 500;

pub struct HfImporter {
    client: reqwest::Client,
    base_url: String,
}

pub struct ImportedDataset {
    pub name: String,
    pub description: String,
    pub url: String,
    pub task_type: TaskType,
    pub primary_metric: ScoreKey,
    pub additional_metrics: Vec<ScoreKey>,
    pub ground_truth: Vec<GroundTruthItem>,
}

/// Task mapping for datasets we recognize; everything else is treated as
/// text classification.
pub fn task_for_dataset(dataset_name: &str) -> TaskType {
    match dataset_name {
        "ag_news" | "sst2" | "imdb" | "financial_phrasebank" => TaskType::TextClassification,
        "squad" | "squad_v2" | "wikitext" | "truthful_qa" => TaskType::DocumentQa,
        "conll2003" => TaskType::NamedEntityRecognition,
        _ => TaskType::TextClassification,
    }
}

/// Default metric selection per task for imported datasets.
pub fn default_metrics(task: TaskType) -> (ScoreKey, Vec<ScoreKey>) {
    match task {
        TaskType::TextClassification => (
            ScoreKey::Accuracy,
            vec![ScoreKey::F1, ScoreKey::Precision, ScoreKey::Recall],
        ),
        TaskType::NamedEntityRecognition => {
            (ScoreKey::F1, vec![ScoreKey::Precision, ScoreKey::Recall])
        }
        TaskType::DocumentQa | TaskType::LineQa => (ScoreKey::ExactMatch, vec![ScoreKey::F1]),
        TaskType::Retrieval => (ScoreKey::RetrievalAccuracy, vec![]),
    }
}

impl HfImporter {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn import(
        &self,
        dataset_name: &str,
        config: &str,
        split: &str,
        num_samples: usize,
    ) -> Result<ImportedDataset, ApiError> {
        info!(dataset=%dataset_name, config=%config, split=%split, num_samples, "hf import: fetching rows");

        // Best-effort metadata probe; the import works without it.
        if let Some(description) = self.fetch_description(dataset_name).await {
            info!(dataset=%dataset_name, description=%description, "hf import: found dataset");
        }

        let rows = self.fetch_rows(dataset_name, config, split, num_samples).await?;
        if rows.is_empty() {
            return Err(ApiError::Upstream(format!(
                "HuggingFace returned no rows for dataset '{dataset_name}'"
            )));
        }

        let task_type = task_for_dataset(dataset_name);
        let (primary_metric, additional_metrics) = default_metrics(task_type);
        let ground_truth = convert_rows(&rows);

        info!(dataset=%dataset_name, task=%task_type, examples = ground_truth.len(), "hf import: converted");

        Ok(ImportedDataset {
            name: format!("{} (HuggingFace)", title_case(dataset_name)),
            description: format!("Imported from HuggingFace dataset: {dataset_name}"),
            url: format!("https://huggingface.co/datasets/{dataset_name}"),
            task_type,
            primary_metric,
            additional_metrics,
            ground_truth,
        })
    }

    async fn fetch_description(&self, dataset_name: &str) -> Option<String> {
        let url = format!("{}/info", self.base_url);
        let body: Value = self
            .client
            .get(&url)
            .query(&[("dataset", dataset_name)])
            .send()
            .await
            .ok()?
            .json()
            .await
            .ok()?;
        body.get("dataset_info")
            .and_then(|info| info.get("description"))
            .and_then(Value::as_str)
            .map(|s| truncate_chars(s, 100))
    }

    async fn fetch_rows(
        &self,
        dataset_name: &str,
        config: &str,
        split: &str,
        num_samples: usize,
    ) -> Result<Vec<Value>, ApiError> {
        let url = format!("{}/rows", self.base_url);
        let length = num_samples.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("dataset", dataset_name),
                ("config", config),
                ("split", split),
                ("offset", "0"),
                ("length", length.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("HuggingFace request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "HuggingFace returned HTTP {} for dataset '{dataset_name}'",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("HuggingFace response unreadable: {e}")))?;

        Ok(body
            .get("rows")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}

/// Map raw rows to ground truth, probing the field names the common HF
/// datasets use. Rows that carry none of them still convert (the whole row
/// as text, "unknown" as answer) rather than aborting the import.
pub fn convert_rows(rows: &[Value]) -> Vec<GroundTruthItem> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let data = row.get("row").cloned().unwrap_or_else(|| row.clone());

            let question = ["text", "sentence", "question", "context"]
                .iter()
                .find_map(|field| data.get(*field).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| data.to_string());

            let answer = extract_answer(&data).unwrap_or_else(|| "unknown".to_string());

            GroundTruthItem {
                id: (i + 1).to_string(),
                question: Some(truncate_chars(&question, QUESTION_MAX_CHARS)),
                answer: Value::String(answer),
            }
        })
        .collect()
}

fn extract_answer(data: &Value) -> Option<String> {
    for field in ["label", "answer", "label_text"] {
        match data.get(field) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            Some(Value::Bool(b)) => return Some(b.to_string()),
            _ => {}
        }
    }
    // SQuAD-style answers object: {"text": [...], "answer_start": [...]}.
    data.get("answers")
        .and_then(|answers| answers.get("text"))
        .and_then(Value::as_array)
        .and_then(|texts| texts.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_datasets_map_to_their_tasks() {
        assert_eq!(task_for_dataset("ag_news"), TaskType::TextClassification);
        assert_eq!(task_for_dataset("squad"), TaskType::DocumentQa);
        assert_eq!(
            task_for_dataset("conll2003"),
            TaskType::NamedEntityRecognition
        );
        assert_eq!(task_for_dataset("who_knows"), TaskType::TextClassification);
    }

    #[test]
    fn classification_rows_use_text_and_numeric_label() {
        let rows = vec![json!({"row": {"text": "great movie", "label": 1}})];
        let gt = convert_rows(&rows);
        assert_eq!(gt.len(), 1);
        assert_eq!(gt[0].id, "1");
        assert_eq!(gt[0].question.as_deref(), Some("great movie"));
        assert_eq!(gt[0].answer, json!("1"));
    }

    #[test]
    fn squad_rows_pull_the_first_answer_text() {
        let rows = vec![json!({
            "row": {
                "question": "Where is the Eiffel Tower?",
                "context": "The Eiffel Tower is in Paris.",
                "answers": {"text": ["Paris"], "answer_start": [27]}
            }
        })];
        let gt = convert_rows(&rows);
        assert_eq!(gt[0].answer, json!("Paris"));
        // "question" wins over "context" only when no "text"/"sentence".
        assert_eq!(gt[0].question.as_deref(), Some("Where is the Eiffel Tower?"));
    }

    #[test]
    fn rows_without_known_fields_still_convert() {
        let rows = vec![json!({"row": {"payload": 42}})];
        let gt = convert_rows(&rows);
        assert_eq!(gt[0].answer, json!("unknown"));
        assert!(gt[0].question.as_deref().unwrap().contains("payload"));
    }

    #[test]
    fn long_questions_are_truncated() {
        let long_text = "x".repeat(2_000);
        let rows = vec![json!({"row": {"text": long_text, "label": "a"}})];
        let gt = convert_rows(&rows);
        assert_eq!(gt[0].question.as_deref().unwrap().chars().count(), 500);
    }

    #[test]
    fn display_names_are_title_cased() {
        assert_eq!(title_case("ag_news"), "Ag News");
        assert_eq!(title_case("financial_phrasebank"), "Financial Phrasebank");
    }
}
