use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::entities::FileRecord;

/// DTO for file metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileDto {
    pub name: String,
    pub size_bytes: u64,
}

impl From<FileRecord> for FileDto {
    fn from(record: FileRecord) -> Self {
        Self {
            name: record.name().to_string(),
            size_bytes: record.size_bytes(),
        }
    }
}

/// DTO for download response metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DownloadMetadata {
    pub name: String,
    pub size_bytes: u64,
    pub updated_at: DateTime<Utc>,
}

impl From<&FileRecord> for DownloadMetadata {
    fn from(record: &FileRecord) -> Self {
        Self {
            name: record.name().to_string(),
            size_bytes: record.size_bytes(),
            updated_at: record.updated_at(),
        }
    }
}

/// Error body returned for every 4xx/5xx response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error kind (e.g. `not_found`)
    pub error: String,
    /// Human-readable description
    pub message: String,
}
