use std::io;
use thiserror::Error;

use domain::error::DomainError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Frame source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Codec error: {message}")]
    CodecError { message: String },

    #[error("Task error: {message}")]
    TaskError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

impl AppError {
    #[must_use]
    pub fn is_corrupt_document(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::CorruptData(_) | DomainError::LengthMismatch { .. })
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
