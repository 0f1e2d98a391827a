use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::{ChatModel, EmbeddingModel};
use super::types::{extract_message_content, ChatMessage, ChatRequest};
use crate::core::config::OpenAiSettings;
use crate::core::errors::AgentError;

const PROVIDER: &str = "openai";

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct OpenAiChatModel {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    client: Client,
}

impl OpenAiChatModel {
    pub fn new(settings: &OpenAiSettings) -> Self {
        Self::with_endpoint(&settings.base_url, &settings.api_key, &settings.model_name)
    }

    pub fn with_endpoint(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: 0.0,
            client: Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest::new(self.model.clone(), vec![ChatMessage::user(prompt)])
            .with_temperature(self.temperature);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::provider(PROVIDER, e))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(AgentError::provider_status(PROVIDER, status.as_u16(), text));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| AgentError::provider(PROVIDER, e))?;

        extract_message_content(&payload).ok_or_else(|| {
            AgentError::provider(PROVIDER, "chat response did not contain message content")
        })
    }
}

/// OpenAI-compatible embeddings client.
#[derive(Clone)]
pub struct OpenAiEmbeddings {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiEmbeddings {
    pub fn new(settings: &OpenAiSettings) -> Self {
        Self::with_endpoint(&settings.base_url, &settings.api_key, &settings.embedding_model)
    }

    pub fn with_endpoint(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiEmbeddings {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AgentError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": inputs,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::provider(PROVIDER, e))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(AgentError::provider_status(PROVIDER, status.as_u16(), text));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| AgentError::provider(PROVIDER, e))?;

        let mut data: Vec<&Value> = payload["data"]
            .as_array()
            .map(|items| items.iter().collect())
            .unwrap_or_default();
        // Order by the reported index; the API does not promise input order.
        data.sort_by_key(|item| item["index"].as_u64().unwrap_or(u64::MAX));

        let embeddings: Vec<Vec<f32>> = data
            .iter()
            .filter_map(|item| item["embedding"].as_array())
            .map(|vals| {
                vals.iter()
                    .filter_map(|v| v.as_f64().map(|f| f as f32))
                    .collect()
            })
            .collect();

        if embeddings.len() != inputs.len() {
            return Err(AgentError::provider(
                PROVIDER,
                format!(
                    "expected {} embeddings, received {}",
                    inputs.len(),
                    embeddings.len()
                ),
            ));
        }

        Ok(embeddings)
    }
}
