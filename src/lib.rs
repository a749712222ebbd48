//! meshwatch - simulated endpoint network with live topology notifications
//!
//! A small network of independently running HTTP endpoint processes wired
//! into a logical topology graph. The crate tracks each node's liveness and
//! activity, recomputes a 2-D layout on every topology change, and streams
//! "network changed" tokens to an observer callback through a queue drained
//! by a dedicated background worker.

pub mod network;
pub mod node;
pub mod notify;
pub mod port;
pub mod topology;

pub use network::{Network, NetworkConfig, NetworkError};
pub use node::{NodeBuilder, NodeProcess, NodeState};
pub use notify::NotificationWorker;
pub use port::PortAllocator;
pub use topology::NetworkTopology;
