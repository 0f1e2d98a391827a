use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::graph::node::GraphError;

/// Errors raised while answering a question.
///
/// Configuration problems are kept apart from per-question provider failures so
/// callers can tell a misconfigured process from a flaky upstream.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{provider} error{}: {body}", fmt_status(.status))]
    Provider {
        provider: String,
        status: Option<u16>,
        body: String,
    },

    #[error("vector store error: {0}")]
    Store(String),

    #[error("document error: {0}")]
    Document(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("state error: {0}")]
    State(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl AgentError {
    pub fn configuration(message: impl Into<String>) -> Self {
        AgentError::Configuration(message.into())
    }

    /// Provider failure with an HTTP status and the response body.
    pub fn provider_status(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        AgentError::Provider {
            provider: provider.into(),
            status: Some(status),
            body: body.into(),
        }
    }

    /// Provider failure that never produced a response (transport, decode).
    pub fn provider<E: std::fmt::Display>(provider: impl Into<String>, err: E) -> Self {
        AgentError::Provider {
            provider: provider.into(),
            status: None,
            body: err.to_string(),
        }
    }

    pub fn store<E: std::fmt::Display>(err: E) -> Self {
        AgentError::Store(err.to_string())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            AgentError::Provider { status, .. } => *status,
            _ => None,
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

/// HTTP-facing error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("bad gateway: {0}")]
    BadGateway(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AgentError::Configuration(_) => ApiError::ServiceUnavailable(err.to_string()),
            AgentError::Provider { .. } => ApiError::BadGateway(err.to_string()),
            other => ApiError::internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
