use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};

use crate::application::ports::StorageError;

/// Buffer size for I/O operations. 256KB balances throughput and memory use.
pub const BUFFER_SIZE: usize = 256 * 1024;

/// Streams upload bodies to disk while enforcing a size limit.
///
/// At most one buffer of the payload is held in memory at a time, and the
/// limit is checked per chunk, so an oversize body is rejected as soon as the
/// first byte past the limit arrives.
pub struct StreamWriter;

impl StreamWriter {
    /// Copy `reader` into `file`.
    ///
    /// Returns the number of bytes written and the metadata of the written
    /// file. Failures reading `reader` are reported as
    /// [`StorageError::BodyRead`], failures writing `file` as
    /// [`StorageError::Io`].
    pub async fn write_bounded(
        file: File,
        mut reader: impl AsyncRead + Unpin,
        max_size: u64,
        durable: bool,
    ) -> Result<(u64, std::fs::Metadata), StorageError> {
        let mut file = BufWriter::with_capacity(BUFFER_SIZE * 2, file);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let n = reader
                .read(&mut buffer)
                .await
                .map_err(StorageError::BodyRead)?;
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            if total_bytes > max_size {
                return Err(StorageError::TooLarge { max: max_size });
            }

            file.write_all(&buffer[..n]).await?;
        }

        file.flush().await?;

        if durable {
            file.get_mut().sync_all().await?;
        }

        let metadata = file.get_ref().metadata().await?;
        Ok((total_bytes, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::NamedTempFile;
    use tokio::io::ReadBuf;

    /// Yields `prefix`, then fails like a reset connection
    struct FailingReader {
        prefix: Cursor<Vec<u8>>,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            let before = buf.filled().len();
            match Pin::new(&mut self.prefix).poll_read(cx, buf) {
                Poll::Ready(Ok(())) if buf.filled().len() == before => Poll::Ready(Err(
                    std::io::Error::from(std::io::ErrorKind::ConnectionReset),
                )),
                other => other,
            }
        }
    }

    fn temp_file() -> (File, tempfile::TempPath) {
        let (file, path) = NamedTempFile::new().unwrap().into_parts();
        (File::from_std(file), path)
    }

    #[tokio::test]
    async fn test_write_bounded_within_limit() {
        let (file, path) = temp_file();

        let (size, metadata) = StreamWriter::write_bounded(file, Cursor::new(b"hello"), 5, false)
            .await
            .unwrap();

        assert_eq!(size, 5);
        assert_eq!(metadata.len(), 5);
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_write_bounded_rejects_one_byte_over() {
        let (file, _path) = temp_file();

        let result = StreamWriter::write_bounded(file, Cursor::new(b"hello!"), 5, false).await;

        assert!(matches!(result, Err(StorageError::TooLarge { max: 5 })));
    }

    #[tokio::test]
    async fn test_reader_failure_is_body_read() {
        let (file, _path) = temp_file();
        let reader = FailingReader {
            prefix: Cursor::new(b"abc".to_vec()),
        };

        let result = StreamWriter::write_bounded(file, reader, 1024, false).await;

        assert!(matches!(result, Err(StorageError::BodyRead(_))));
    }
}
