use std::path::{Path, PathBuf};

use crate::domain::value_objects::FileName;

/// Utility for generating storage paths
pub struct PathBuilder {
    root: PathBuf,
}

impl PathBuilder {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding published files: /root/files
    pub fn files_dir(&self) -> PathBuf {
        self.root.join("files")
    }

    /// Directory holding in-flight uploads: /root/tmp
    pub fn temp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Generate published path: /root/files/{name}
    ///
    /// `FileName` guarantees a single, non-traversing path component.
    pub fn file_path(&self, name: &FileName) -> PathBuf {
        self.files_dir().join(name.as_str())
    }
}
