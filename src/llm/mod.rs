pub mod openai;
pub mod provider;
pub mod types;

pub use openai::{OpenAiChatModel, OpenAiEmbeddings};
pub use provider::{ChatModel, EmbeddingModel};
pub use types::{extract_message_content, ChatMessage, ChatRequest};
