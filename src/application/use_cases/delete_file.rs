use std::sync::Arc;
use tracing::info;

use crate::application::errors::FileError;
use crate::application::ports::BlobStore;
use crate::domain::value_objects::FileName;

/// Use case: Delete a file
pub struct DeleteFileUseCase {
    blob_store: Arc<dyn BlobStore>,
}

impl DeleteFileUseCase {
    pub fn new(blob_store: Arc<dyn BlobStore>) -> Self {
        Self { blob_store }
    }

    /// Execute delete workflow
    pub async fn execute(&self, name: &str) -> Result<(), FileError> {
        // 1. Validate name
        let name = FileName::new(name)?;

        // 2. Remove; the store reports NotFound atomically, so there is no
        //    separate existence check to race against
        self.blob_store.remove(&name).await?;

        info!(name = %name, "file_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockBlobStore, StorageError};

    #[tokio::test]
    async fn test_delete_file_happy_path() {
        // Arrange
        let mut mock_blob_store = MockBlobStore::new();
        mock_blob_store
            .expect_remove()
            .withf(|name| name.as_str() == "a.txt")
            .times(1)
            .returning(|_| Ok(()));

        let use_case = DeleteFileUseCase::new(Arc::new(mock_blob_store));

        // Act
        let result = use_case.execute("a.txt").await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_file_not_found() {
        let mut mock_blob_store = MockBlobStore::new();
        mock_blob_store
            .expect_remove()
            .times(1)
            .returning(|name| Err(StorageError::NotFound(name.to_string())));

        let use_case = DeleteFileUseCase::new(Arc::new(mock_blob_store));

        let result = use_case.execute("missing.txt").await;

        assert!(matches!(result, Err(FileError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_file_invalid_name() {
        let use_case = DeleteFileUseCase::new(Arc::new(MockBlobStore::new()));

        let result = use_case.execute("a/b").await;

        assert!(matches!(result, Err(FileError::InvalidName(_))));
    }
}
