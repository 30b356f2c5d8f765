use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api::router::AppState;
use crate::application::{
    ports::BlobStore,
    use_cases::{DeleteFileUseCase, DownloadFileUseCase, ListFilesUseCase, UploadFileUseCase},
};
use crate::config::{redact_database_url, Config, StorageBackendKind};
use crate::infrastructure::{persistence::PostgresFileStore, storage::LocalFilesystemStore};

/// Application builder for clean dependency injection and setup
pub struct ApplicationBuilder {
    config: Config,
    blob_store: Option<Arc<dyn BlobStore>>,
}

impl ApplicationBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            blob_store: None,
        }
    }

    /// Initialize the storage backend selected by `STORAGE_BACKEND`
    pub async fn with_store(self) -> Result<Self, Box<dyn std::error::Error>> {
        match self.config.storage_backend {
            StorageBackendKind::Filesystem => self.with_filesystem_store().await,
            StorageBackendKind::Postgres => self.with_postgres_store().await,
        }
    }

    /// Use a caller-provided store (tests, embedding)
    pub fn with_blob_store(mut self, blob_store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(blob_store);
        self
    }

    async fn with_filesystem_store(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        info!(
            "Using filesystem storage at {:?} (durable_writes={})",
            self.config.storage_root, self.config.durable_writes
        );

        let store = LocalFilesystemStore::with_durability(
            self.config.storage_root.clone(),
            self.config.durable_writes,
        );
        store.init().await?;

        self.blob_store = Some(Arc::new(store));
        Ok(self)
    }

    async fn with_postgres_store(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        info!(
            "Connecting to database: {}",
            redact_database_url(&self.config.database_url)
        );

        // Retry connection with exponential backoff
        let mut retries = 3;
        let mut delay = Duration::from_secs(1);
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(self.config.db_max_connections)
                .min_connections(self.config.db_min_connections)
                .acquire_timeout(Duration::from_secs(self.config.db_acquire_timeout_secs))
                .idle_timeout(Some(Duration::from_secs(self.config.db_idle_timeout_secs)))
                .max_lifetime(Some(Duration::from_secs(self.config.db_max_lifetime_secs)))
                .connect(&self.config.database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) if retries > 0 => {
                    retries -= 1;
                    tracing::warn!(
                        "Database connection failed, retrying in {:?} ({} retries left): {}",
                        delay,
                        retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!("Failed to connect to database after retries: {}", e);
                    return Err(Box::new(e));
                }
            }
        };

        info!(
            "Database pool configured: max={}, min={}, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
            self.config.db_max_connections,
            self.config.db_min_connections,
            self.config.db_acquire_timeout_secs,
            self.config.db_idle_timeout_secs,
            self.config.db_max_lifetime_secs
        );

        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;

        self.blob_store = Some(Arc::new(PostgresFileStore::new(pool)));
        Ok(self)
    }

    /// Build application state with all use cases
    pub fn build(self) -> Result<AppState, Box<dyn std::error::Error>> {
        let blob_store = self.blob_store.ok_or("Blob store not initialized")?;

        let upload_use_case = Arc::new(UploadFileUseCase::new(
            Arc::clone(&blob_store),
            self.config.max_upload_bytes,
        ));
        let download_use_case = Arc::new(DownloadFileUseCase::new(Arc::clone(&blob_store)));
        let list_use_case = Arc::new(ListFilesUseCase::new(Arc::clone(&blob_store)));
        let delete_use_case = Arc::new(DeleteFileUseCase::new(Arc::clone(&blob_store)));

        info!("Application layer initialized");

        Ok(AppState {
            blob_store,
            upload_use_case,
            download_use_case,
            list_use_case,
            delete_use_case,
        })
    }
}
