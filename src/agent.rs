//! Single-turn orchestrator: one question in, one answer out.

use std::sync::Arc;

use crate::core::errors::AgentError;
use crate::graph::{build_agent_graph, AgentResponse, AgentState, GraphRuntime, NodeContext};
use crate::state::AgentServices;

pub struct Agent {
    services: Arc<AgentServices>,
    graph: GraphRuntime,
}

impl Agent {
    pub fn new(services: Arc<AgentServices>) -> Result<Self, AgentError> {
        let graph = build_agent_graph()?;
        Ok(Self { services, graph })
    }

    pub fn services(&self) -> &AgentServices {
        &self.services
    }

    /// Route the question, run exactly one pipeline and return its result.
    ///
    /// Pipeline errors are returned unchanged.
    pub async fn invoke(&self, question: &str) -> Result<AgentResponse, AgentError> {
        if question.trim().is_empty() {
            return Err(AgentError::InvalidInput("question must not be empty".to_string()));
        }

        let mut state = AgentState::new(question);
        tracing::info!(request_id = %state.request_id, "Answering question");

        let ctx = NodeContext {
            services: &self.services,
        };
        self.graph.run(&mut state, &ctx).await?;

        state.into_response()
    }
}
