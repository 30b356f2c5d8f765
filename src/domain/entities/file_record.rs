use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::FileName;

/// FileRecord entity - metadata of one fully stored blob
///
/// A record only exists for content that has been completely written and
/// published, so `size_bytes` always matches the readable stream length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    name: FileName,
    size_bytes: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a record for content published just now
    pub fn new(name: FileName, size_bytes: u64) -> Self {
        let now = Utc::now();
        Self {
            name,
            size_bytes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct from storage
    pub fn reconstruct(
        name: FileName,
        size_bytes: u64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            size_bytes,
            created_at,
            updated_at,
        }
    }

    // Getters
    pub fn name(&self) -> &FileName {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
