use std::sync::Arc;
use tracing::debug;

use crate::application::dto::DownloadMetadata;
use crate::application::errors::FileError;
use crate::application::ports::{BlobReader, BlobStore};
use crate::domain::value_objects::FileName;

/// Use case: Download a file
pub struct DownloadFileUseCase {
    blob_store: Arc<dyn BlobStore>,
}

impl DownloadFileUseCase {
    pub fn new(blob_store: Arc<dyn BlobStore>) -> Self {
        Self { blob_store }
    }

    /// Execute download by name.
    ///
    /// The returned reader is owned by the caller and yields exactly
    /// `metadata.size_bytes` bytes.
    pub async fn execute(&self, name: &str) -> Result<(DownloadMetadata, BlobReader), FileError> {
        // 1. Validate name
        let name = FileName::new(name)?;

        // 2. Open blob for reading
        let (record, reader) = self.blob_store.get(&name).await?;
        debug!(name = %name, size_bytes = record.size_bytes(), "file_opened");

        // 3. Return metadata + stream
        Ok((DownloadMetadata::from(&record), reader))
    }
}
