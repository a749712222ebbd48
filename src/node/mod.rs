mod error;
mod process;
mod service;
mod types;

pub use error::{NodeError, NodeResult};
pub use process::{NodeBuilder, NodeProcess};
pub use service::router;
pub use types::{NodeReply, NodeState, NodeStatus};
