// Graph State
// Per-question state carried through the graph

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::errors::AgentError;
use crate::rag::RetrievedDocument;

/// Which answer strategy handles a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Weather,
    Rag,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Weather => "weather",
            Route::Rag => "rag",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data an answer was produced from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum EvidenceRecord {
    /// Raw weather provider payload.
    Weather(Value),
    /// One retrieved passage.
    Document {
        content: String,
        metadata: Map<String, Value>,
    },
}

impl From<RetrievedDocument> for EvidenceRecord {
    fn from(doc: RetrievedDocument) -> Self {
        EvidenceRecord::Document {
            content: doc.content,
            metadata: doc.metadata,
        }
    }
}

/// Main graph state
#[derive(Debug, Clone)]
pub struct AgentState {
    pub request_id: String,
    pub question: String,
    route: Option<Route>,
    answer: Option<String>,
    evidence: Vec<EvidenceRecord>,
}

impl AgentState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            question: question.into(),
            route: None,
            answer: None,
            evidence: Vec::new(),
        }
    }

    pub fn route(&self) -> Option<Route> {
        self.route
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn evidence(&self) -> &[EvidenceRecord] {
        &self.evidence
    }

    /// Record the routing decision. Only the first call succeeds.
    pub fn set_route(&mut self, route: Route) -> Result<(), AgentError> {
        if let Some(existing) = self.route {
            return Err(AgentError::State(format!(
                "route already set to '{}', refusing '{}'",
                existing, route
            )));
        }
        self.route = Some(route);
        Ok(())
    }

    /// Record the answer and its evidence. Only the first call succeeds.
    pub fn record_answer(
        &mut self,
        answer: String,
        evidence: Vec<EvidenceRecord>,
    ) -> Result<(), AgentError> {
        if self.answer.is_some() {
            return Err(AgentError::State("answer already recorded".to_string()));
        }
        self.answer = Some(answer);
        self.evidence = evidence;
        Ok(())
    }

    /// Project the terminal state for callers.
    pub fn into_response(self) -> Result<AgentResponse, AgentError> {
        let route = self
            .route
            .ok_or_else(|| AgentError::State("graph finished without a route".to_string()))?;
        let answer = self
            .answer
            .ok_or_else(|| AgentError::State("graph finished without an answer".to_string()))?;
        Ok(AgentResponse {
            answer,
            route,
            evidence: self.evidence,
        })
    }
}

/// Final answer returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub answer: String,
    pub route: Route,
    pub evidence: Vec<EvidenceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn route_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Route::Weather).unwrap(), json!("weather"));
        assert_eq!(serde_json::from_value::<Route>(json!("rag")).unwrap(), Route::Rag);
        assert_eq!(Route::Rag.to_string(), "rag");
    }

    #[test]
    fn route_is_set_once() {
        let mut state = AgentState::new("q");
        state.set_route(Route::Rag).unwrap();
        let err = state.set_route(Route::Weather).unwrap_err();
        assert!(matches!(err, AgentError::State(_)));
        assert_eq!(state.route(), Some(Route::Rag));
    }

    #[test]
    fn answer_is_written_once() {
        let mut state = AgentState::new("q");
        state
            .record_answer("first".into(), vec![EvidenceRecord::Weather(json!({}))])
            .unwrap();
        let err = state.record_answer("second".into(), Vec::new()).unwrap_err();
        assert!(matches!(err, AgentError::State(_)));
        assert_eq!(state.answer(), Some("first"));
        assert_eq!(state.evidence().len(), 1);
    }

    #[test]
    fn evidence_is_adjacently_tagged() {
        let weather = EvidenceRecord::Weather(json!({"main": {"temp": 4}}));
        assert_eq!(
            serde_json::to_value(&weather).unwrap(),
            json!({"kind": "weather", "data": {"main": {"temp": 4}}})
        );

        let mut metadata = Map::new();
        metadata.insert("page".into(), json!(3));
        let doc = EvidenceRecord::from(RetrievedDocument {
            content: "text".into(),
            metadata,
        });
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"kind": "document", "data": {"content": "text", "metadata": {"page": 3}}})
        );
    }

    #[test]
    fn response_requires_route_and_answer() {
        let state = AgentState::new("q");
        assert!(state.into_response().is_err());

        let mut state = AgentState::new("q");
        state.set_route(Route::Weather).unwrap();
        state.record_answer("sunny".into(), Vec::new()).unwrap();
        let response = state.into_response().unwrap();
        assert_eq!(response.route, Route::Weather);
        assert_eq!(response.answer, "sunny");
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(AgentState::new("a").request_id, AgentState::new("a").request_id);
    }
}
