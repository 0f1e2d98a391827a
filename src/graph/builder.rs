// Graph Builder
// Constructs the agent graph: router -> {weather | rag} -> end

use super::node::GraphError;
use super::nodes::{RagNode, RouterNode, WeatherNode};
use super::runtime::{GraphBuilder, GraphRuntime};
use super::state::Route;

pub fn build_agent_graph() -> Result<GraphRuntime, GraphError> {
    GraphBuilder::new()
        .entry("router")
        .max_steps(5)
        .node(Box::new(RouterNode::new()))
        .node(Box::new(WeatherNode::new()))
        .node(Box::new(RagNode::new()))
        // Router branches on the route tag; both handlers end the run
        .conditional_edge("router", "weather", Route::Weather.as_str())
        .conditional_edge("router", "rag", Route::Rag.as_str())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_is_acyclic_with_three_nodes() {
        let graph = build_agent_graph().unwrap();
        let mut ids = graph.node_ids();
        ids.sort();
        assert_eq!(ids, vec!["rag", "router", "weather"]);
        assert!(!graph.has_cycle());
    }

    #[test]
    fn nodes_have_display_names() {
        use crate::graph::node::Node;

        assert_eq!(RouterNode::new().name(), "Question Router");
        assert_eq!(WeatherNode::new().name(), "Weather Lookup");
        assert_eq!(RagNode::new().name(), "PDF Retrieval");
    }
}
