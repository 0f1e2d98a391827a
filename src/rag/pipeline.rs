use super::retriever::{DocumentRetriever, RetrievedDocument};
use crate::core::errors::AgentError;
use crate::llm::ChatModel;

pub const RAG_PROMPT_TEMPLATE: &str = "You are a helpful assistant. Use the provided context to answer the question.
If the answer is not contained in the context, say you don't know.

Context:
{context}

Question: {question}
";

/// Concatenate passage contents, separated by a blank line.
pub fn format_docs(docs: &[RetrievedDocument]) -> String {
    docs.iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_rag_prompt(question: &str, docs: &[RetrievedDocument]) -> String {
    RAG_PROMPT_TEMPLATE
        .replace("{context}", &format_docs(docs))
        .replace("{question}", question)
}

/// Retrieve once, then answer from those passages.
///
/// The returned documents are exactly the ones the prompt was built from.
pub async fn answer_with_rag(
    question: &str,
    model: &dyn ChatModel,
    retriever: &dyn DocumentRetriever,
) -> Result<(String, Vec<RetrievedDocument>), AgentError> {
    let docs = retriever.retrieve(question).await?;
    tracing::debug!("Retrieved {} passages", docs.len());

    let prompt = build_rag_prompt(question, &docs);
    let answer = model.generate(&prompt).await?;

    Ok((answer, docs))
}
