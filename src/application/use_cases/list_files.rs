use std::sync::Arc;

use crate::application::errors::FileError;
use crate::application::ports::BlobStore;

/// Use case: List stored file names
pub struct ListFilesUseCase {
    blob_store: Arc<dyn BlobStore>,
}

impl ListFilesUseCase {
    pub fn new(blob_store: Arc<dyn BlobStore>) -> Self {
        Self { blob_store }
    }

    /// Execute list.
    ///
    /// Files created or deleted while the listing runs may or may not appear.
    pub async fn execute(&self) -> Result<Vec<String>, FileError> {
        let names = self.blob_store.list().await?;

        Ok(names.into_iter().map(|name| name.into_inner()).collect())
    }
}
