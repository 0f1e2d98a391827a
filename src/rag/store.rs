//! RagStore trait — abstract interface for vector storage backends.
//!
//! Chunks live in named collections; a collection fixes the embedding
//! dimension of everything inserted into it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::errors::AgentError;

/// A stored chunk with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Unique identifier within the collection.
    pub chunk_id: String,
    /// The text content of the chunk.
    pub content: String,
    /// Free-form metadata (source path, page number, ...).
    pub metadata: Map<String, Value>,
}

/// Result of a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSearchResult {
    pub chunk: StoredChunk,
    /// Cosine similarity (higher = better).
    pub score: f32,
}

#[async_trait]
pub trait RagStore: Send + Sync {
    /// Create a collection. Fails if it already exists.
    async fn create_collection(&self, name: &str, dimension: usize) -> Result<(), AgentError>;

    async fn collection_exists(&self, name: &str) -> Result<bool, AgentError>;

    /// Insert chunks, replacing any with the same id. Returns the number written.
    async fn insert_batch(
        &self,
        collection: &str,
        items: Vec<(StoredChunk, Vec<f32>)>,
    ) -> Result<usize, AgentError>;

    /// Top `limit` chunks by similarity, best first. Equal scores keep
    /// insertion order.
    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ChunkSearchResult>, AgentError>;

    async fn count(&self, collection: &str) -> Result<usize, AgentError>;
}
