use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("Length mismatch: expected {expected} pixels, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
