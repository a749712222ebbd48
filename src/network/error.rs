use crate::node::NodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("failed to start node '{name}': {source}")]
    NodeStart {
        name: String,
        #[source]
        source: NodeError,
    },

    /// Best-effort shutdown completed, but one or more nodes failed to stop
    /// cleanly. Every node was still attempted and the notification worker
    /// was still shut down.
    #[error("shutdown completed with {failed} node failure(s)")]
    Shutdown {
        failed: usize,
        errors: Vec<(String, NodeError)>,
    },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
