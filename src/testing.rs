//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;

use std::sync::Arc;

use crate::core::config::Settings;
use crate::core::errors::AgentError;
use crate::evaluation::EvaluationLogger;
use crate::llm::{ChatModel, EmbeddingModel};
use crate::rag::{DocumentRetriever, RetrievedDocument};
use crate::state::AgentServices;
use crate::weather::WeatherSource;

/// Settings with only the required variables set.
pub fn test_settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "PDF_PATH" => Some("docs/handbook.pdf".to_string()),
        "OPENWEATHER_DEFAULT_CITY" => Some("London".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Services wired to the given doubles.
pub fn services_with(
    model: Arc<dyn ChatModel>,
    weather: Arc<dyn WeatherSource>,
    retriever: Arc<dyn DocumentRetriever>,
) -> AgentServices {
    let settings = test_settings();
    let evaluation = EvaluationLogger::new(settings.evaluation.clone());
    AgentServices::from_parts(settings, model, weather, retriever, evaluation)
}

/// Services whose collaborators are inert doubles.
pub fn stub_services() -> AgentServices {
    services_with(
        Arc::new(ScriptedModel::new("stub")),
        Arc::new(StubWeather::ok(Value::Null)),
        Arc::new(StubRetriever::new(Vec::new())),
    )
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_stub_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// Chat model returning a fixed reply and recording every prompt.
pub struct ScriptedModel {
    reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Chat model that answers with its own prompt.
pub struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        Ok(format!("Fake answer about {}", prompt))
    }
}

/// Chat model whose every call fails.
pub struct FailingModel;

#[async_trait]
impl ChatModel for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, AgentError> {
        Err(AgentError::provider_status("failing", 503, "model unavailable"))
    }
}

/// Routing model: answers the router prompt with `route_reply`, anything else
/// with `answer`.
pub struct RoutingModel {
    route_reply: Result<String, ()>,
    answer: String,
    pub prompts: Mutex<Vec<String>>,
}

impl RoutingModel {
    pub fn new(route_reply: &str, answer: &str) -> Self {
        Self {
            route_reply: Ok(route_reply.to_string()),
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_router(answer: &str) -> Self {
        Self {
            route_reply: Err(()),
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for RoutingModel {
    fn name(&self) -> &str {
        "routing"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.starts_with("You are a router") {
            return self
                .route_reply
                .clone()
                .map_err(|_| AgentError::provider("routing", "router call failed"));
        }
        Ok(self.answer.clone())
    }
}

/// Deterministic embeddings: counts of a few marker words.
pub struct KeywordEmbeddings;

pub const EMBEDDING_MARKERS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

#[async_trait]
impl EmbeddingModel for KeywordEmbeddings {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AgentError> {
        Ok(inputs
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                EMBEDDING_MARKERS
                    .iter()
                    .map(|marker| lower.matches(marker).count() as f32 + 0.01)
                    .collect()
            })
            .collect())
    }
}

/// Weather source returning a canned payload.
pub struct StubWeather {
    result: Result<Value, (u16, String)>,
    pub cities: Mutex<Vec<String>>,
}

impl StubWeather {
    pub fn ok(payload: Value) -> Self {
        Self {
            result: Ok(payload),
            cities: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            result: Err((status, body.to_string())),
            cities: Mutex::new(Vec::new()),
        }
    }

    pub fn cities(&self) -> Vec<String> {
        self.cities.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherSource for StubWeather {
    async fn fetch(&self, city: &str) -> Result<Value, AgentError> {
        self.cities.lock().unwrap().push(city.to_string());
        match &self.result {
            Ok(payload) => Ok(payload.clone()),
            Err((status, body)) => Err(AgentError::provider_status("stub-weather", *status, body.clone())),
        }
    }
}

/// Retriever returning fixed documents and counting calls.
pub struct StubRetriever {
    documents: Vec<RetrievedDocument>,
    calls: AtomicUsize,
}

impl StubRetriever {
    pub fn new(documents: Vec<RetrievedDocument>) -> Self {
        Self {
            documents,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentRetriever for StubRetriever {
    async fn retrieve(&self, _query: &str) -> Result<Vec<RetrievedDocument>, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.documents.clone())
    }
}
