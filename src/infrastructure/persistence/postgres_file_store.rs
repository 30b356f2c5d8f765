use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, Stream};
use sqlx::{PgPool, Postgres, Transaction};
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::application::ports::{BlobReader, BlobStore, StorageError};
use crate::domain::entities::FileRecord;
use crate::domain::value_objects::FileName;
use crate::infrastructure::storage::BUFFER_SIZE;

/// Postgres-backed blob store.
///
/// Content lives in `file_chunks` as ordered BYTEA chunks of up to
/// [`BUFFER_SIZE`] bytes. An upload runs in one transaction: it first inserts
/// the `files` row (the primary key is the atomic check-and-create), then
/// streams chunks, then commits. Nothing is visible to other sessions before
/// the commit, and dropping the transaction on error or cancellation rolls
/// everything back.
///
/// A second upload of a name that is still being written blocks on the
/// primary key until the first transaction ends, then fails with
/// `AlreadyExists` (or proceeds if the first one rolled back).
///
/// A download reads inside its own snapshot transaction, which keeps one
/// pooled connection checked out until the stream is finished or dropped.
/// Concurrent downloads are therefore bounded by `DB_MAX_CONNECTIONS`.
pub struct PostgresFileStore {
    pool: PgPool,
}

impl PostgresFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Fill `buffer` from `reader` until it is full or the reader is exhausted
async fn read_chunk(reader: &mut BlobReader, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        let n = reader.read(&mut buffer[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Yield the chunks of `name` in order, reading through the snapshot of `tx`
fn chunk_stream(
    tx: Transaction<'static, Postgres>,
    name: String,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send {
    stream::try_unfold((tx, name, 0i32), |(mut tx, name, seq)| async move {
        let chunk: Option<Vec<u8>> = sqlx::query_scalar(
            "SELECT data FROM file_chunks WHERE file_name = $1 AND seq = $2",
        )
        .bind(&name)
        .bind(seq)
        .fetch_optional(&mut *tx)
        .await
        .map_err(std::io::Error::other)?;

        match chunk {
            Some(data) => Ok(Some((Bytes::from(data), (tx, name, seq + 1)))),
            None => {
                tx.commit().await.map_err(std::io::Error::other)?;
                Ok(None)
            }
        }
    })
}

fn map_claim_error(name: &FileName, err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StorageError::AlreadyExists(name.to_string())
        }
        other => StorageError::Database(other),
    }
}

#[async_trait]
impl BlobStore for PostgresFileStore {
    async fn put(
        &self,
        name: &FileName,
        mut reader: BlobReader,
        declared_size: Option<u64>,
        max_size: u64,
    ) -> Result<FileRecord, StorageError> {
        if declared_size.is_some_and(|size| size > max_size) {
            return Err(StorageError::TooLarge { max: max_size });
        }

        let mut tx = self.pool.begin().await?;

        // 1. Claim the name
        sqlx::query("INSERT INTO files (name) VALUES ($1)")
            .bind(name.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_claim_error(name, e))?;

        // 2. Stream chunks; returning early drops `tx`, which rolls back
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut total_bytes = 0u64;
        let mut seq = 0i32;

        loop {
            let n = read_chunk(&mut reader, &mut buffer)
                .await
                .map_err(StorageError::BodyRead)?;
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            if total_bytes > max_size {
                debug!("Upload of {} exceeded {} bytes, rolling back", name, max_size);
                return Err(StorageError::TooLarge { max: max_size });
            }

            sqlx::query("INSERT INTO file_chunks (file_name, seq, data) VALUES ($1, $2, $3)")
                .bind(name.as_str())
                .bind(seq)
                .bind(&buffer[..n])
                .execute(&mut *tx)
                .await?;
            seq += 1;

            if n < buffer.len() {
                break;
            }
        }

        if let Some(expected) = declared_size {
            if expected != total_bytes {
                return Err(StorageError::Incomplete {
                    expected,
                    actual: total_bytes,
                });
            }
        }

        // 3. Record the final size and publish
        let row = sqlx::query_as::<_, FileRow>(
            r#"
            UPDATE files
            SET size_bytes = $2, updated_at = now()
            WHERE name = $1
            RETURNING name, size_bytes, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(total_bytes as i64)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!("Committed {} ({} bytes in {} chunks)", name, total_bytes, seq);
        row.into_domain()
    }

    async fn get(&self, name: &FileName) -> Result<(FileRecord, BlobReader), StorageError> {
        let mut tx = self.pool.begin().await?;

        // Every later read in this transaction sees the same snapshot, so a
        // concurrent delete cannot truncate the stream
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, FileRow>(
            "SELECT name, size_bytes, created_at, updated_at FROM files WHERE name = $1",
        )
        .bind(name.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let record = match row {
            Some(row) => row.into_domain()?,
            None => return Err(StorageError::NotFound(name.to_string())),
        };

        let reader: BlobReader = Box::pin(StreamReader::new(chunk_stream(
            tx,
            name.to_string(),
        )));

        Ok((record, reader))
    }

    async fn exists(&self, name: &FileName) -> Result<bool, StorageError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM files WHERE name = $1)")
                .bind(name.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list(&self) -> Result<Vec<FileName>, StorageError> {
        // Byte-wise collation keeps the order identical to the filesystem store
        let names: Vec<String> =
            sqlx::query_scalar(r#"SELECT name FROM files ORDER BY name COLLATE "C""#)
                .fetch_all(&self.pool)
                .await?;

        names
            .into_iter()
            .map(|n| FileName::new(n).map_err(|e| StorageError::Internal(e.to_string())))
            .collect()
    }

    async fn remove(&self, name: &FileName) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM files WHERE name = $1")
            .bind(name.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(name.to_string()));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Internal row mapping struct
#[derive(sqlx::FromRow)]
struct FileRow {
    name: String,
    size_bytes: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl FileRow {
    fn into_domain(self) -> Result<FileRecord, StorageError> {
        let name =
            FileName::new(self.name).map_err(|e| StorageError::Internal(e.to_string()))?;

        let size_bytes = u64::try_from(self.size_bytes).map_err(|_| {
            StorageError::Internal(format!("Negative size for {}: {}", name, self.size_bytes))
        })?;

        Ok(FileRecord::reconstruct(
            name,
            size_bytes,
            self.created_at,
            self.updated_at,
        ))
    }
}
