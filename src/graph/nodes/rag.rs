// RAG Node
// Answers from passages of the configured PDF

use async_trait::async_trait;

use crate::core::errors::AgentError;
use crate::graph::node::{Node, NodeContext, NodeOutput};
use crate::graph::state::{AgentState, EvidenceRecord};
use crate::rag::answer_with_rag;

pub struct RagNode;

impl RagNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RagNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for RagNode {
    fn id(&self) -> &'static str {
        "rag"
    }

    fn name(&self) -> &'static str {
        "PDF Retrieval"
    }

    async fn execute(
        &self,
        state: &mut AgentState,
        ctx: &NodeContext<'_>,
    ) -> Result<NodeOutput, AgentError> {
        let services = ctx.services;
        let (answer, docs) = answer_with_rag(
            &state.question,
            services.chat_model.as_ref(),
            services.retriever.as_ref(),
        )
        .await?;

        tracing::debug!(request_id = %state.request_id, "RAG answer used {} passages", docs.len());

        let evidence = docs.into_iter().map(EvidenceRecord::from).collect();
        state.record_answer(answer, evidence)?;
        Ok(NodeOutput::Final)
    }
}
