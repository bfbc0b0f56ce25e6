use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("device not open")]
    NotConnected,
    #[error("command failed with code {0}")]
    Command(i32),
    #[error("invalid value")]
    InvalidValue,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
