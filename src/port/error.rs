use std::net::IpAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortError {
    #[error("no free port on {address} within {attempts} candidates starting at {start_port}")]
    Exhausted {
        address: IpAddr,
        start_port: u16,
        attempts: u16,
    },
}

pub type PortResult<T> = Result<T, PortError>;
