use std::sync::Arc;

use crate::core::config::{AppPaths, Settings};
use crate::core::errors::AgentError;
use crate::evaluation::EvaluationLogger;
use crate::llm::{ChatModel, EmbeddingModel, OpenAiChatModel, OpenAiEmbeddings};
use crate::rag::{DocumentRetriever, PdfIndexRetriever, RagStore, SqliteRagStore};
use crate::weather::{WeatherClient, WeatherSource};

/// Shared collaborators, built once at startup and handed to every graph node.
pub struct AgentServices {
    pub settings: Settings,
    pub chat_model: Arc<dyn ChatModel>,
    pub weather: Arc<dyn WeatherSource>,
    pub retriever: Arc<dyn DocumentRetriever>,
    pub evaluation: EvaluationLogger,
}

impl AgentServices {
    /// Wire the production clients from settings. The retrieval index is not
    /// built here; the first PDF question triggers it.
    pub async fn initialize(settings: Settings, paths: &AppPaths) -> Result<Self, AgentError> {
        let openai = OpenAiChatModel::new(&settings.openai);
        let sqlite = SqliteRagStore::with_path(&paths.vector_db_path).await?;

        tracing::info!(
            "Services ready: model={}, vector store={}",
            openai.model(),
            sqlite.db_path().display()
        );

        let chat_model: Arc<dyn ChatModel> = Arc::new(openai);
        let embeddings: Arc<dyn EmbeddingModel> = Arc::new(OpenAiEmbeddings::new(&settings.openai));
        let weather: Arc<dyn WeatherSource> = Arc::new(WeatherClient::new(settings.weather.clone())?);

        let store: Arc<dyn RagStore> = Arc::new(sqlite);
        let retriever: Arc<dyn DocumentRetriever> =
            Arc::new(PdfIndexRetriever::new(settings.pdf.clone(), store, embeddings));

        let evaluation = EvaluationLogger::new(settings.evaluation.clone());

        Ok(Self::from_parts(settings, chat_model, weather, retriever, evaluation))
    }

    pub fn from_parts(
        settings: Settings,
        chat_model: Arc<dyn ChatModel>,
        weather: Arc<dyn WeatherSource>,
        retriever: Arc<dyn DocumentRetriever>,
        evaluation: EvaluationLogger,
    ) -> Self {
        Self {
            settings,
            chat_model,
            weather,
            retriever,
            evaluation,
        }
    }
}
