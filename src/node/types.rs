use serde::{Deserialize, Serialize};

/// Lifecycle state of a node's background server.
///
/// Activity is not part of this state machine: `active` is an independent
/// flag toggled around each served request, orthogonal to online/offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeState {
    Offline = 0,
    Starting = 1,
    Online = 2,
    Stopping = 3,
}

impl NodeState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => NodeState::Starting,
            2 => NodeState::Online,
            3 => NodeState::Stopping,
            _ => NodeState::Offline,
        }
    }
}

/// Body returned by a node's root endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeReply {
    pub node: String,
    pub message: String,
}

/// Snapshot returned by a node's status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatus {
    pub name: String,
    pub address: String,
    pub port: u16,
    pub online: bool,
    pub active: bool,
    pub latency_ms: u64,
}
