mod blob_store;

pub use blob_store::{BlobReader, BlobStore, StorageError};

#[cfg(test)]
pub use blob_store::MockBlobStore;
