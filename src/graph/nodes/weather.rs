// Weather Node
// Live weather lookup summarized by the chat model

use async_trait::async_trait;

use crate::core::errors::AgentError;
use crate::graph::node::{Node, NodeContext, NodeOutput};
use crate::graph::state::{AgentState, EvidenceRecord};
use crate::weather::answer_weather_question;

pub struct WeatherNode;

impl WeatherNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeatherNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for WeatherNode {
    fn id(&self) -> &'static str {
        "weather"
    }

    fn name(&self) -> &'static str {
        "Weather Lookup"
    }

    async fn execute(
        &self,
        state: &mut AgentState,
        ctx: &NodeContext<'_>,
    ) -> Result<NodeOutput, AgentError> {
        let services = ctx.services;
        let (answer, payload) = answer_weather_question(
            &state.question,
            &services.settings.weather.default_city,
            services.weather.as_ref(),
            services.chat_model.as_ref(),
        )
        .await?;

        state.record_answer(answer, vec![EvidenceRecord::Weather(payload)])?;
        Ok(NodeOutput::Final)
    }
}
