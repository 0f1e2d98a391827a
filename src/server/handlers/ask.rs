use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map};

use crate::agent::Agent;
use crate::core::errors::ApiError;
use crate::graph::AgentResponse;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Answer one question. Evaluation logging runs detached after the answer.
pub async fn ask(
    State(agent): State<Arc<Agent>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let response = agent.invoke(&request.question).await.map_err(|err| {
        tracing::warn!("Question failed: {}", err);
        ApiError::from(err)
    })?;

    let logger = agent.services().evaluation.clone();
    if logger.is_enabled() {
        let question = request.question;
        let answer = response.answer.clone();
        let route = response.route;
        let mut metadata = Map::new();
        metadata.insert("evidence".to_string(), json!(response.evidence));

        tokio::spawn(async move {
            logger
                .log_response(&question, &answer, route.as_str(), Some(metadata))
                .await;
        });
    }

    Ok(Json(response))
}
