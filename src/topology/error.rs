use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("node '{0}' already exists")]
    DuplicateName(String),

    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("no connection between '{0}' and '{1}'")]
    ConnectionNotFound(String, String),

    #[error("cannot connect node '{0}' to itself")]
    SelfConnection(String),

    #[error("node '{0}' is online and cannot be removed")]
    NodeOnline(String),
}

pub type TopologyResult<T> = Result<T, TopologyError>;
