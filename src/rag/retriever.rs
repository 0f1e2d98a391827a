use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tokio::sync::OnceCell;

use super::loader::{load_pdf_pages, PageDocument};
use super::store::{RagStore, StoredChunk};
use crate::core::config::PdfSettings;
use crate::core::errors::AgentError;
use crate::llm::EmbeddingModel;

/// Number of passages returned per query.
pub const DEFAULT_TOP_K: usize = 4;

const EMBED_BATCH_SIZE: usize = 64;

/// A passage returned by retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub content: String,
    pub metadata: Map<String, Value>,
}

/// Relevance-ordered passage lookup.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>, AgentError>;
}

/// Embeds the query and searches one collection.
pub struct VectorRetriever {
    store: Arc<dyn RagStore>,
    embeddings: Arc<dyn EmbeddingModel>,
    collection: String,
    top_k: usize,
}

impl VectorRetriever {
    pub fn new(
        store: Arc<dyn RagStore>,
        embeddings: Arc<dyn EmbeddingModel>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embeddings,
            collection: collection.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }
}

#[async_trait]
impl DocumentRetriever for VectorRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>, AgentError> {
        let mut vectors = self.embeddings.embed(&[query.to_string()]).await?;
        let query_embedding = vectors
            .pop()
            .ok_or_else(|| AgentError::provider(self.embeddings.name(), "no embedding returned for query"))?;

        let results = self
            .store
            .search(&self.collection, &query_embedding, self.top_k)
            .await?;

        Ok(results
            .into_iter()
            .map(|result| RetrievedDocument {
                content: result.chunk.content,
                metadata: result.chunk.metadata,
            })
            .collect())
    }
}

/// Retriever over the configured PDF. The index is built on first use and
/// kept for the life of the process.
pub struct PdfIndexRetriever {
    pdf: PdfSettings,
    store: Arc<dyn RagStore>,
    embeddings: Arc<dyn EmbeddingModel>,
    top_k: usize,
    index: OnceCell<VectorRetriever>,
}

impl PdfIndexRetriever {
    pub fn new(
        pdf: PdfSettings,
        store: Arc<dyn RagStore>,
        embeddings: Arc<dyn EmbeddingModel>,
    ) -> Self {
        Self {
            pdf,
            store,
            embeddings,
            top_k: DEFAULT_TOP_K,
            index: OnceCell::new(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn is_built(&self) -> bool {
        self.index.initialized()
    }

    async fn retriever(&self) -> Result<&VectorRetriever, AgentError> {
        // OnceCell lets exactly one caller build; a failed build leaves the
        // cell empty so the next question tries again.
        self.index.get_or_try_init(|| self.build()).await
    }

    async fn build(&self) -> Result<VectorRetriever, AgentError> {
        tracing::info!(
            "Building retrieval index for {} (collection '{}')",
            self.pdf.pdf_path.display(),
            self.pdf.collection_name
        );

        let pages = load_pdf_pages(&self.pdf.pdf_path).await?;
        let inserted = index_documents(
            self.store.as_ref(),
            self.embeddings.as_ref(),
            &self.pdf.collection_name,
            &pages,
        )
        .await?;

        tracing::info!(
            "Indexed {} pages into collection '{}'",
            inserted,
            self.pdf.collection_name
        );

        Ok(VectorRetriever::new(
            self.store.clone(),
            self.embeddings.clone(),
            self.pdf.collection_name.clone(),
        )
        .with_top_k(self.top_k))
    }
}

#[async_trait]
impl DocumentRetriever for PdfIndexRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>, AgentError> {
        self.retriever().await?.retrieve(query).await
    }
}

/// Embed `pages` and write them into `collection`, creating it when needed.
///
/// An existing collection is not an error; ids are content-derived so the
/// same pages land on the same rows.
pub async fn index_documents(
    store: &dyn RagStore,
    embeddings: &dyn EmbeddingModel,
    collection: &str,
    pages: &[PageDocument],
) -> Result<usize, AgentError> {
    if pages.is_empty() {
        return Ok(0);
    }

    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(pages.len());
    for batch in pages.chunks(EMBED_BATCH_SIZE) {
        let inputs: Vec<String> = batch.iter().map(|p| p.content.clone()).collect();
        vectors.extend(embeddings.embed(&inputs).await?);
    }

    let dimension = vectors.first().map(Vec::len).unwrap_or_default();
    match store.create_collection(collection, dimension).await {
        Ok(()) => tracing::info!("Created collection: {}", collection),
        Err(err) => tracing::warn!(
            "Error creating collection {}: {} (continuing, it may already exist)",
            collection,
            err
        ),
    }

    let items: Vec<(StoredChunk, Vec<f32>)> = pages
        .iter()
        .zip(vectors)
        .map(|(page, embedding)| {
            (
                StoredChunk {
                    chunk_id: chunk_id(collection, page),
                    content: page.content.clone(),
                    metadata: page.metadata.clone(),
                },
                embedding,
            )
        })
        .collect();

    store.insert_batch(collection, items).await
}

fn chunk_id(collection: &str, page: &PageDocument) -> String {
    let mut hasher = Sha256::new();
    for part in [
        collection,
        page.source(),
        &page.page().to_string(),
        page.content.as_str(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
