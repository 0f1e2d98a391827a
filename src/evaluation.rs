//! Best-effort evaluation logging to a LangSmith-compatible endpoint.

use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::core::config::EvaluationSettings;

/// Records question/answer pairs as dataset examples.
///
/// Disabled when no API key is configured. Failures are logged at debug and
/// never reach the caller.
#[derive(Clone)]
pub struct EvaluationLogger {
    settings: EvaluationSettings,
    client: reqwest::Client,
}

impl EvaluationLogger {
    pub fn new(settings: EvaluationSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.api_key.is_some()
    }

    pub fn build_example(
        &self,
        question: &str,
        answer: &str,
        route: &str,
        metadata: Option<Map<String, Value>>,
    ) -> Value {
        let mut meta = Map::new();
        meta.insert("route".to_string(), json!(route));
        if let Some(extra) = metadata {
            meta.extend(extra);
        }

        let mut example = json!({
            "inputs": { "question": question },
            "outputs": { "answer": answer },
            "metadata": meta,
            "created_at": Utc::now().to_rfc3339(),
        });
        if let Some(dataset_id) = &self.settings.dataset_id {
            example["dataset_id"] = json!(dataset_id);
        }
        example
    }

    pub async fn log_response(
        &self,
        question: &str,
        answer: &str,
        route: &str,
        metadata: Option<Map<String, Value>>,
    ) {
        let Some(api_key) = self.settings.api_key.as_deref() else {
            tracing::debug!("Evaluation logging disabled (LANGSMITH_API_KEY not set)");
            return;
        };

        let url = format!("{}/examples", self.settings.endpoint.trim_end_matches('/'));
        let example = self.build_example(question, answer, route, metadata);

        match self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .json(&example)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Logged evaluation example (route={})", route);
            }
            Ok(response) => {
                tracing::debug!("Evaluation logging rejected with status {}", response.status());
            }
            Err(err) => {
                tracing::debug!("Evaluation logging failed: {}", err);
            }
        }
    }
}
