//! SQLite-backed RAG store implementation.
//!
//! In-process vector store using SQLite for chunks and metadata and
//! brute-force cosine similarity for search.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use super::store::{ChunkSearchResult, RagStore, StoredChunk};
use crate::core::errors::AgentError;

pub struct SqliteRagStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SqliteRagStore {
    pub async fn with_path(db_path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let db_path = db_path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(AgentError::store)?;

        let store = Self { pool, db_path };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn init_schema(&self) -> Result<(), AgentError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                dimension INTEGER NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(AgentError::store)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chunks (
                collection TEXT NOT NULL REFERENCES collections(name) ON DELETE CASCADE,
                chunk_id TEXT NOT NULL,
                ordinal INTEGER NOT NULL,
                content TEXT NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{}',
                embedding BLOB NOT NULL,
                PRIMARY KEY (collection, chunk_id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(AgentError::store)?;

        Ok(())
    }

    async fn dimension(&self, collection: &str) -> Result<usize, AgentError> {
        let dimension: Option<i64> =
            sqlx::query_scalar("SELECT dimension FROM collections WHERE name = ?1")
                .bind(collection)
                .fetch_optional(&self.pool)
                .await
                .map_err(AgentError::store)?;

        dimension
            .map(|d| d as usize)
            .ok_or_else(|| AgentError::Store(format!("collection '{}' does not exist", collection)))
    }

    fn row_to_chunk(row: &sqlx::sqlite::SqliteRow) -> StoredChunk {
        let metadata_str: String = row.get("metadata");
        let metadata = serde_json::from_str::<Map<String, Value>>(&metadata_str).unwrap_or_default();

        StoredChunk {
            chunk_id: row.get("chunk_id"),
            content: row.get("content"),
            metadata,
        }
    }
}

fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

#[async_trait]
impl RagStore for SqliteRagStore {
    async fn create_collection(&self, name: &str, dimension: usize) -> Result<(), AgentError> {
        let result = sqlx::query("INSERT INTO collections (name, dimension) VALUES (?1, ?2)")
            .bind(name)
            .bind(dimension as i64)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AgentError::Store(format!("collection '{}' already exists", name)),
            ),
            Err(err) => Err(AgentError::store(err)),
        }
    }

    async fn collection_exists(&self, name: &str) -> Result<bool, AgentError> {
        let found: Option<String> =
            sqlx::query_scalar("SELECT name FROM collections WHERE name = ?1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(AgentError::store)?;
        Ok(found.is_some())
    }

    async fn insert_batch(
        &self,
        collection: &str,
        items: Vec<(StoredChunk, Vec<f32>)>,
    ) -> Result<usize, AgentError> {
        if items.is_empty() {
            return Ok(0);
        }

        let dimension = self.dimension(collection).await?;
        if let Some((chunk, embedding)) = items.iter().find(|(_, e)| e.len() != dimension) {
            return Err(AgentError::Store(format!(
                "embedding for chunk '{}' has {} dimensions, collection '{}' expects {}",
                chunk.chunk_id,
                embedding.len(),
                collection,
                dimension
            )));
        }

        let mut tx = self.pool.begin().await.map_err(AgentError::store)?;

        for (chunk, embedding) in &items {
            let blob = serialize_embedding(embedding);
            let metadata_str =
                serde_json::to_string(&chunk.metadata).unwrap_or_else(|_| "{}".to_string());

            // Re-inserting an existing id refreshes it in place and keeps its ordinal.
            sqlx::query(
                "INSERT INTO chunks (collection, chunk_id, ordinal, content, metadata, embedding)
                 VALUES (?1, ?2,
                         (SELECT COALESCE(MAX(ordinal), -1) + 1 FROM chunks WHERE collection = ?1),
                         ?3, ?4, ?5)
                 ON CONFLICT(collection, chunk_id) DO UPDATE SET
                     content = excluded.content,
                     metadata = excluded.metadata,
                     embedding = excluded.embedding",
            )
            .bind(collection)
            .bind(&chunk.chunk_id)
            .bind(&chunk.content)
            .bind(&metadata_str)
            .bind(&blob)
            .execute(&mut *tx)
            .await
            .map_err(AgentError::store)?;
        }

        tx.commit().await.map_err(AgentError::store)?;
        Ok(items.len())
    }

    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ChunkSearchResult>, AgentError> {
        let rows = sqlx::query(
            "SELECT chunk_id, ordinal, content, metadata, embedding
             FROM chunks
             WHERE collection = ?1
             ORDER BY ordinal ASC",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(AgentError::store)?;

        let mut scored: Vec<(i64, ChunkSearchResult)> = rows
            .iter()
            .map(|row| {
                let embedding_bytes: Vec<u8> = row.get("embedding");
                let stored_emb = deserialize_embedding(&embedding_bytes);
                let ordinal: i64 = row.get("ordinal");
                (
                    ordinal,
                    ChunkSearchResult {
                        chunk: Self::row_to_chunk(row),
                        score: cosine_similarity(query_embedding, &stored_emb),
                    },
                )
            })
            .collect();

        scored.sort_by(|(ord_a, a), (ord_b, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(ord_a.cmp(ord_b))
        });
        scored.truncate(limit.max(1));

        Ok(scored.into_iter().map(|(_, result)| result).collect())
    }

    async fn count(&self, collection: &str) -> Result<usize, AgentError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks WHERE collection = ?1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await
            .map_err(AgentError::store)?;
        Ok(count as usize)
    }
}
