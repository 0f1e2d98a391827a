pub mod agent;
pub mod core;
pub mod evaluation;
pub mod graph;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
pub mod weather;

#[cfg(test)]
mod testing;

pub use agent::Agent;
pub use crate::core::config::Settings;
pub use crate::core::errors::{AgentError, ApiError};
pub use graph::{AgentResponse, EvidenceRecord, Route};
pub use state::AgentServices;
