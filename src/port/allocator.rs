//! Free-port discovery within a bounded search window.

use crate::port::error::{PortError, PortResult};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};

/// Default bind address for simulated nodes.
pub const DEFAULT_BIND_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

/// Default starting port for the search window.
pub const DEFAULT_START_PORT: u16 = 8000;

/// Default number of candidate ports probed per allocation.
pub const DEFAULT_PORT_WINDOW: u16 = 10;

/// Finds a free local port by probing a window of candidates.
///
/// A candidate is accepted if a test bind succeeds; the test socket is
/// released immediately. Allocation does not reserve the port, so the caller's
/// real bind can still lose a race to another process. Callers treat that
/// bind failure as retryable, not as an invariant violation.
#[derive(Debug, Clone)]
pub struct PortAllocator {
    address: IpAddr,
    start_port: u16,
    max_attempts: u16,
}

impl PortAllocator {
    pub fn new(address: IpAddr, start_port: u16, max_attempts: u16) -> Self {
        Self {
            address,
            start_port,
            max_attempts,
        }
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    /// Allocate a free port starting from the configured start port.
    pub fn allocate(&self) -> PortResult<u16> {
        self.allocate_from(self.start_port)
    }

    /// Allocate a free port starting from `start`, probing at most
    /// `max_attempts` candidates.
    pub fn allocate_from(&self, start: u16) -> PortResult<u16> {
        for offset in 0..self.max_attempts {
            let Some(candidate) = start.checked_add(offset) else {
                break;
            };
            if TcpListener::bind(SocketAddr::new(self.address, candidate)).is_ok() {
                return Ok(candidate);
            }
        }

        Err(PortError::Exhausted {
            address: self.address,
            start_port: start,
            attempts: self.max_attempts,
        })
    }
}

impl Default for PortAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_BIND_ADDRESS, DEFAULT_START_PORT, DEFAULT_PORT_WINDOW)
    }
}
