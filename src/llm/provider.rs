use async_trait::async_trait;

use crate::core::errors::AgentError;

/// Text generation capability.
///
/// Adapters normalize whatever shape the backend returns into plain text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// return the backend name (e.g. "openai")
    fn name(&self) -> &str;

    /// single-turn completion of `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, AgentError>;
}

/// Text embedding capability.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    fn name(&self) -> &str;

    /// one vector per input, same order
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AgentError>;
}
