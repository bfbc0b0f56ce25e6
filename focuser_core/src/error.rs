use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum FocuserError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware command failed with code {0}")]
    CommandFailed(i32),
    #[error("device not connected")]
    NotConnected,
    #[error("invalid state: {0}")]
    State(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing driver")]
    MissingDriver,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
