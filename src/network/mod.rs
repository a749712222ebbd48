mod error;
mod network;
mod types;

pub use error::{NetworkError, NetworkResult};
pub use network::Network;
pub use types::NetworkConfig;
