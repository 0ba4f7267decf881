use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;

const MAX_NAME_LEN: usize = 255;
const MAX_EXTENSION_LEN: usize = 16;

/// A flat file name inside a blob store directory.
///
/// Generated names are a random UUID token, optionally followed by a
/// normalized extension: `9f1c...e2` or `9f1c...e2.pdf`. Parsed names only
/// need to be safe to join onto the store root.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobName(String);

impl BlobName {
    /// Generate a fresh name. The token is never derived from the content
    /// or the original file name.
    pub fn generate(extension: Option<&str>) -> Self {
        let token = Uuid::new_v4().to_string();
        match extension.and_then(normalize_extension) {
            Some(ext) => Self(format!("{token}.{ext}")),
            None => Self(token),
        }
    }

    /// Parse a caller-supplied name, rejecting anything that could escape
    /// the store directory.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.is_empty() {
            return Err(StorageError::InvalidName("name cannot be empty".into()));
        }
        if s.len() > MAX_NAME_LEN {
            return Err(StorageError::InvalidName(format!(
                "name exceeds {MAX_NAME_LEN} bytes"
            )));
        }
        if s.chars().any(|c| c.is_control()) {
            return Err(StorageError::InvalidName(
                "control characters are not allowed".into(),
            ));
        }
        if s.contains('/') || s.contains('\\') {
            return Err(StorageError::InvalidName(
                "path separators are not allowed".into(),
            ));
        }
        if s.starts_with('.') {
            return Err(StorageError::InvalidName(
                "names starting with '.' are not allowed".into(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The extension after the last dot, as stored.
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.0.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext)
    }
}

/// Normalize an extension (with or without a leading dot) to lowercase
/// ASCII alphanumerics. Returns `None` for anything unusable.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.');
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

impl AsRef<str> for BlobName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobName({})", self.0)
    }
}

impl fmt::Display for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BlobName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BlobName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
