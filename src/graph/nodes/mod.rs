// Graph Nodes

mod rag;
mod router;
mod weather;

pub use rag::RagNode;
pub use router::{build_router_prompt, decide_route, heuristic_route, parse_route_response, RouterNode};
pub use weather::WeatherNode;
