// Router Node
// Entry point that decides between the weather and PDF strategies

use async_trait::async_trait;

use crate::core::errors::AgentError;
use crate::graph::node::{Node, NodeContext, NodeOutput};
use crate::graph::state::{AgentState, Route};
use crate::llm::ChatModel;

const WEATHER_KEYWORDS: [&str; 9] = [
    "weather",
    "temperature",
    "rain",
    "forecast",
    "humidity",
    "wind",
    "snow",
    "sunny",
    "cloudy",
];

/// Keyword fallback: any weather word selects the weather route.
pub fn heuristic_route(question: &str) -> Route {
    let lowered = question.to_lowercase();
    if WEATHER_KEYWORDS.iter().any(|word| lowered.contains(word)) {
        Route::Weather
    } else {
        Route::Rag
    }
}

pub fn build_router_prompt(question: &str) -> String {
    format!(
        "You are a router deciding whether a user question is about real-time weather \
         or about the contents of a static PDF document.\n\n\
         Return exactly one word: 'weather' or 'rag'.\n\n\
         Question: {question}"
    )
}

/// Read the classifier's reply. `None` when it names both routes or neither.
pub fn parse_route_response(response: &str) -> Option<Route> {
    let content = response.trim().to_lowercase();
    match (content.contains("weather"), content.contains("rag")) {
        (true, false) => Some(Route::Weather),
        (false, true) => Some(Route::Rag),
        _ => None,
    }
}

/// Two-tier routing: ask the model, fall back to keywords. Never fails.
pub async fn decide_route(question: &str, model: &dyn ChatModel) -> Route {
    match model.generate(&build_router_prompt(question)).await {
        Ok(response) => parse_route_response(&response).unwrap_or_else(|| {
            tracing::debug!("Ambiguous router reply {:?}, using keyword heuristic", response);
            heuristic_route(question)
        }),
        Err(err) => {
            tracing::warn!("Router model call failed, using keyword heuristic: {}", err);
            heuristic_route(question)
        }
    }
}

pub struct RouterNode;

impl RouterNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RouterNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for RouterNode {
    fn id(&self) -> &'static str {
        "router"
    }

    fn name(&self) -> &'static str {
        "Question Router"
    }

    async fn execute(
        &self,
        state: &mut AgentState,
        ctx: &NodeContext<'_>,
    ) -> Result<NodeOutput, AgentError> {
        let route = decide_route(&state.question, ctx.services.chat_model.as_ref()).await;
        state.set_route(route)?;

        tracing::info!(request_id = %state.request_id, "Router: routing to {}", route);

        Ok(NodeOutput::Branch(route.as_str().to_string()))
    }
}
