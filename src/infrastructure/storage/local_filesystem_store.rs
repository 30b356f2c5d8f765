use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs::{self, File};
use tokio::io::BufReader;
use tracing::{debug, info, warn};

use crate::application::ports::{BlobReader, BlobStore, StorageError};
use crate::domain::entities::FileRecord;
use crate::domain::value_objects::FileName;
use crate::infrastructure::storage::{PathBuilder, StreamWriter};

/// Local filesystem blob store.
///
/// Uploads are streamed into `tmp/` and published into `files/` with a
/// no-clobber persist, which fails if the target exists. The persist is the
/// atomic check-and-create, so concurrent uploads of one name have a single winner
/// and readers never see a partially written file. Published files are never
/// modified, and an open handle keeps reading the same inode after an unlink.
pub struct LocalFilesystemStore {
    path_builder: PathBuilder,
    durable_writes: bool,
}

impl LocalFilesystemStore {
    pub fn new(root: PathBuf) -> Self {
        Self::with_durability(root, true)
    }

    pub fn with_durability(root: PathBuf, durable_writes: bool) -> Self {
        Self {
            path_builder: PathBuilder::new(root),
            durable_writes,
        }
    }

    /// Initialize storage directories and discard uploads interrupted by a
    /// previous crash
    pub async fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.path_builder.files_dir()).await?;

        let temp_dir = self.path_builder.temp_dir();
        fs::create_dir_all(&temp_dir).await?;

        let mut removed = 0usize;
        let mut entries = fs::read_dir(&temp_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove stale temp file {:?}: {}", entry.path(), e),
            }
        }

        info!(
            root = %self.path_builder.root().display(),
            stale_temp_files_removed = removed,
            "Filesystem store initialized"
        );
        Ok(())
    }

    fn record_from_metadata(name: FileName, metadata: &std::fs::Metadata) -> FileRecord {
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        // Birth time is not available on every filesystem
        let created = metadata
            .created()
            .map(DateTime::<Utc>::from)
            .unwrap_or(modified);

        FileRecord::reconstruct(name, metadata.len(), created, modified)
    }

    async fn sync_dir(&self, dir: &Path) {
        if !self.durable_writes {
            return;
        }
        match File::open(dir).await {
            Ok(dir_file) => {
                if let Err(e) = dir_file.sync_all().await {
                    // The link already happened; durability is best effort here
                    warn!("Failed to sync directory {:?}: {}", dir, e);
                }
            }
            Err(e) => warn!("Failed to open directory {:?} for sync: {}", dir, e),
        }
    }
}

fn not_found_or_io(name: &FileName) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |e| {
        if e.kind() == ErrorKind::NotFound {
            StorageError::NotFound(name.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

#[async_trait]
impl BlobStore for LocalFilesystemStore {
    async fn put(
        &self,
        name: &FileName,
        reader: BlobReader,
        declared_size: Option<u64>,
        max_size: u64,
    ) -> Result<FileRecord, StorageError> {
        if declared_size.is_some_and(|size| size > max_size) {
            return Err(StorageError::TooLarge { max: max_size });
        }

        // 1. Stream into a private temp file; the TempPath deletes it on any
        //    early return or if this future is dropped
        let (temp_file, temp_path) =
            NamedTempFile::new_in(self.path_builder.temp_dir())?.into_parts();
        debug!("Writing {} to temp file: {:?}", name, temp_path);

        let (size_bytes, metadata) = StreamWriter::write_bounded(
            File::from_std(temp_file),
            reader,
            max_size,
            self.durable_writes,
        )
        .await
        .inspect_err(|e| debug!("Upload of {} aborted: {}", name, e))?;

        if let Some(expected) = declared_size {
            if expected != size_bytes {
                return Err(StorageError::Incomplete {
                    expected,
                    actual: size_bytes,
                });
            }
        }

        // 2. Publish: persist_noclobber refuses to replace an existing name
        let final_path = self.path_builder.file_path(name);
        tokio::task::spawn_blocking(move || temp_path.persist_noclobber(final_path))
            .await
            .map_err(|e| StorageError::Internal(format!("Publish task failed: {}", e)))?
            .map_err(|e| {
                if e.error.kind() == ErrorKind::AlreadyExists {
                    StorageError::AlreadyExists(name.to_string())
                } else {
                    StorageError::Io(e.error)
                }
            })?;
        self.sync_dir(&self.path_builder.files_dir()).await;

        debug!("Published {} ({} bytes)", name, size_bytes);
        Ok(Self::record_from_metadata(name.clone(), &metadata))
    }

    async fn get(&self, name: &FileName) -> Result<(FileRecord, BlobReader), StorageError> {
        let path = self.path_builder.file_path(name);

        let file = File::open(&path).await.map_err(not_found_or_io(name))?;

        // Stat the open handle so size and stream refer to the same inode
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let record = Self::record_from_metadata(name.clone(), &metadata);
        Ok((record, Box::pin(BufReader::new(file))))
    }

    async fn exists(&self, name: &FileName) -> Result<bool, StorageError> {
        let path = self.path_builder.file_path(name);
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn list(&self) -> Result<Vec<FileName>, StorageError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(self.path_builder.files_dir()).await?;

        while let Some(entry) = entries.next_entry().await? {
            // An entry can vanish between readdir and stat; skip it
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StorageError::Io(e)),
            };
            if !file_type.is_file() {
                continue;
            }

            match entry.file_name().into_string().map(FileName::new) {
                Ok(Ok(name)) => names.push(name),
                _ => warn!("Skipping unexpected entry in files dir: {:?}", entry.path()),
            }
        }

        names.sort();
        Ok(names)
    }

    async fn remove(&self, name: &FileName) -> Result<(), StorageError> {
        let path = self.path_builder.file_path(name);

        fs::remove_file(&path).await.map_err(not_found_or_io(name))?;
        self.sync_dir(&self.path_builder.files_dir()).await;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let files_dir = self.path_builder.files_dir();
        let metadata = fs::metadata(&files_dir).await?;
        if !metadata.is_dir() {
            return Err(StorageError::Internal(format!(
                "{} is not a directory",
                files_dir.display()
            )));
        }
        Ok(())
    }
}
