use crate::port::PortError;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("node '{0}' is not offline; bind target can only change while offline")]
    HostLocked(String),

    #[error("node '{name}' failed to bind {addr}: {source}")]
    Bind {
        name: String,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("node '{name}' server task did not shut down cleanly: {reason}")]
    Shutdown { name: String, reason: String },

    #[error("port allocation failed: {0}")]
    Port(#[from] PortError),
}

pub type NodeResult<T> = Result<T, NodeError>;
