mod error;
mod graph;
mod layout;
mod types;

pub use error::{TopologyError, TopologyResult};
pub use graph::NetworkTopology;
pub use types::{Connection, Position};
