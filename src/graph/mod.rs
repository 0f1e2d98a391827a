// Agent Graph Module
// LangGraph-style StateGraph on petgraph

pub mod builder;
pub mod node;
pub mod runtime;
pub mod state;

pub mod nodes;

pub use builder::build_agent_graph;
pub use node::{GraphError, Node, NodeContext, NodeOutput};
pub use runtime::{EdgeCondition, GraphBuilder, GraphRuntime};
pub use state::{AgentResponse, AgentState, EvidenceRecord, Route};
