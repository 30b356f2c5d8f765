use std::sync::Arc;
use tracing::info;

use crate::application::dto::FileDto;
use crate::application::errors::FileError;
use crate::application::ports::{BlobReader, BlobStore};
use crate::domain::value_objects::FileName;

/// Use case: Upload a file under a new name
pub struct UploadFileUseCase {
    blob_store: Arc<dyn BlobStore>,
    max_upload_bytes: u64,
}

impl UploadFileUseCase {
    pub fn new(blob_store: Arc<dyn BlobStore>, max_upload_bytes: u64) -> Self {
        Self {
            blob_store,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Execute upload workflow
    pub async fn execute(
        &self,
        name: &str,
        reader: BlobReader,
        declared_size: Option<u64>,
    ) -> Result<FileDto, FileError> {
        // 1. Validate name
        let name = FileName::new(name)?;

        // 2. Reject a declared oversize body before reading any of it
        if declared_size.is_some_and(|size| size > self.max_upload_bytes) {
            return Err(FileError::TooLarge {
                max: self.max_upload_bytes,
            });
        }

        // 3. Stream into the store; existence check and create are one step there
        let record = self
            .blob_store
            .put(&name, reader, declared_size, self.max_upload_bytes)
            .await?;

        info!(name = %record.name(), size_bytes = record.size_bytes(), "file_uploaded");

        Ok(FileDto::from(record))
    }
}
