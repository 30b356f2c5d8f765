use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Validated file identifier, safe to use as a single path component or
/// database key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileName(String);

impl FileName {
    /// Maximum length in bytes. Matches the usual filesystem component limit.
    pub const MAX_LENGTH: usize = 255;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::InvalidFileName(
                "File name cannot be empty".to_string(),
            ));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidFileName(format!(
                "File name too long: {} > {} bytes",
                value.len(),
                Self::MAX_LENGTH
            )));
        }

        if value.contains('/') || value.contains('\\') {
            return Err(DomainError::InvalidFileName(
                "File name cannot contain path separators".to_string(),
            ));
        }

        if value == "." || value == ".." {
            return Err(DomainError::InvalidFileName(
                "File name cannot be a relative path segment".to_string(),
            ));
        }

        // Covers NUL, the rest of C0, DEL and C1.
        if value.chars().any(char::is_control) {
            return Err(DomainError::InvalidFileName(
                "File name cannot contain control characters".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FileName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FileName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FileName> for String {
    fn from(name: FileName) -> Self {
        name.0
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
