//! Retrieval-augmented answering over a PDF.
//!
//! - `loader`: PDF to per-page documents
//! - `store` / `sqlite`: vector storage
//! - `retriever`: lazy index build and similarity lookup
//! - `pipeline`: prompt assembly and answering

pub mod loader;
pub mod pipeline;
pub mod retriever;
pub mod sqlite;
pub mod store;

pub use loader::{load_pdf_pages, PageDocument};
pub use pipeline::{answer_with_rag, build_rag_prompt, format_docs, RAG_PROMPT_TEMPLATE};
pub use retriever::{
    index_documents, DocumentRetriever, PdfIndexRetriever, RetrievedDocument, VectorRetriever,
    DEFAULT_TOP_K,
};
pub use sqlite::SqliteRagStore;
pub use store::{ChunkSearchResult, RagStore, StoredChunk};
