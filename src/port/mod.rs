mod allocator;
mod error;

pub use allocator::{PortAllocator, DEFAULT_BIND_ADDRESS, DEFAULT_PORT_WINDOW, DEFAULT_START_PORT};
pub use error::{PortError, PortResult};
