use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::domain::entities::FileRecord;
use crate::domain::value_objects::FileName;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("File exceeds maximum size of {max} bytes")]
    TooLarge { max: u64 },

    #[error("Body ended after {actual} of {expected} declared bytes")]
    Incomplete { expected: u64, actual: u64 },

    /// The upload body could not be read (client aborted or reset)
    #[error("Failed to read upload body: {0}")]
    BodyRead(std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Type alias for async reader
pub type BlobReader = Pin<Box<dyn AsyncRead + Send>>;

/// Port for durable, name-keyed blob storage.
///
/// Implementations must make `put` an atomic check-and-create: two concurrent
/// puts of the same name resolve to exactly one success and one
/// `AlreadyExists`. Content becomes visible only once fully written, and any
/// partial data is discarded before an error is returned or when the `put`
/// future is dropped.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stream `reader` into a new blob named `name`.
    ///
    /// Fails with `TooLarge` as soon as more than `max_size` bytes have been
    /// read, or immediately if `declared_size` already exceeds it.
    async fn put(
        &self,
        name: &FileName,
        reader: BlobReader,
        declared_size: Option<u64>,
        max_size: u64,
    ) -> Result<FileRecord, StorageError>;

    /// Open a blob for reading. The stream reflects the content at open time.
    async fn get(&self, name: &FileName) -> Result<(FileRecord, BlobReader), StorageError>;

    /// Check if a blob exists
    async fn exists(&self, name: &FileName) -> Result<bool, StorageError>;

    /// List all stored names, sorted
    async fn list(&self) -> Result<Vec<FileName>, StorageError>;

    /// Delete a blob
    async fn remove(&self, name: &FileName) -> Result<(), StorageError>;

    /// Probe the underlying medium
    async fn ping(&self) -> Result<(), StorageError>;
}
