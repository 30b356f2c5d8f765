//! Error taxonomy shared by the file use cases
//!
//! Every use case reports failures through [`FileError`], so the HTTP layer
//! maps one enum instead of one per operation.

use thiserror::Error;

use crate::application::ports::StorageError;
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("File exceeds maximum size of {max} bytes")]
    TooLarge { max: u64 },

    #[error("Body ended after {actual} of {expected} declared bytes")]
    Incomplete { expected: u64, actual: u64 },

    #[error("Upload body could not be read: {0}")]
    BodyRead(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl FileError {
    /// Stable machine-readable kind, used as the `error` field of responses
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::InvalidName(_) => "invalid_name",
            FileError::NotFound(_) => "not_found",
            FileError::AlreadyExists(_) => "already_exists",
            FileError::TooLarge { .. } => "too_large",
            FileError::Incomplete { .. } | FileError::BodyRead(_) => "incomplete_body",
            FileError::Storage(_) => "internal_error",
        }
    }
}

impl From<DomainError> for FileError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidFileName(msg) => FileError::InvalidName(msg),
        }
    }
}

// Lift the business outcomes a store reports into the taxonomy; everything
// else stays an infrastructure failure.
impl From<StorageError> for FileError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(name) => FileError::NotFound(name),
            StorageError::AlreadyExists(name) => FileError::AlreadyExists(name),
            StorageError::TooLarge { max } => FileError::TooLarge { max },
            StorageError::Incomplete { expected, actual } => {
                FileError::Incomplete { expected, actual }
            }
            StorageError::BodyRead(e) => FileError::BodyRead(e.to_string()),
            other => FileError::Storage(other),
        }
    }
}
