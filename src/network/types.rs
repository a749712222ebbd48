use crate::port::{DEFAULT_BIND_ADDRESS, DEFAULT_PORT_WINDOW, DEFAULT_START_PORT};
use std::net::IpAddr;

/// Configuration for the network composition root.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Address every node binds to.
    pub bind_address: IpAddr,

    /// First candidate port for per-node allocation.
    pub base_port: u16,

    /// Number of candidate ports probed per allocation.
    pub port_window: u16,

    /// Assign each node a free port from the window on start. When false,
    /// nodes keep whatever bind target they were configured with.
    pub auto_assign_ports: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS,
            base_port: DEFAULT_START_PORT,
            port_window: DEFAULT_PORT_WINDOW,
            auto_assign_ports: true,
        }
    }
}
