use std::fmt;

use serde::{Deserialize, Serialize};

use super::validator::DOCUMENT_MIME_TYPES;

/// Which collection an asset row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Media,
    Documents,
}

impl Collection {
    /// Value stored in the `collection` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Documents => "documents",
        }
    }

    /// Singular noun used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Media => "Media",
            Self::Documents => "Document",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-collection behavior of an [`AssetStore`](super::AssetStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetPolicy {
    /// Accepted MIME types. `None` accepts anything.
    #[serde(default)]
    pub allowed_mime_types: Option<Vec<String>>,
    /// Directory under the upload root; empty for the root itself.
    pub subdirectory: String,
    /// Unlink the blob when its record is removed.
    pub delete_blob_on_remove: bool,
    /// Suffix generated names with the upload's extension.
    pub keep_extension: bool,
    /// Store the caller-supplied file name on the record.
    #[serde(default)]
    pub record_original_name: bool,
    /// Resolve a content type from the extension on retrieval.
    #[serde(default)]
    pub resolve_content_type: bool,
}

impl AssetPolicy {
    /// Any file type, stored at the upload root under an extension-less
    /// name, unlinked on remove.
    pub fn media() -> Self {
        Self {
            allowed_mime_types: None,
            subdirectory: String::new(),
            delete_blob_on_remove: true,
            keep_extension: false,
            record_original_name: true,
            resolve_content_type: false,
        }
    }

    /// Office documents, PDF and plain text under `documents/`.
    ///
    /// Removing a document keeps its blob on disk.
    // TODO: decide with product whether retained document blobs are meant
    // for undo; flip `delete_blob_on_remove` once confirmed.
    pub fn documents() -> Self {
        Self {
            allowed_mime_types: Some(DOCUMENT_MIME_TYPES.iter().map(|s| s.to_string()).collect()),
            subdirectory: "documents".into(),
            delete_blob_on_remove: false,
            keep_extension: true,
            record_original_name: false,
            resolve_content_type: true,
        }
    }

    /// Public URL prefix of this collection, without a trailing slash.
    pub fn url_prefix(&self) -> String {
        let subdirectory = self.subdirectory.trim_matches('/');
        if subdirectory.is_empty() {
            "/uploads".to_string()
        } else {
            format!("/uploads/{subdirectory}")
        }
    }

    /// Reject subdirectories that would leave the upload root.
    pub fn validate(&self) -> Result<(), String> {
        let subdirectory = self.subdirectory.trim_matches('/');
        if subdirectory.is_empty() {
            return Ok(());
        }
        for segment in subdirectory.split('/') {
            if segment.is_empty() || segment.starts_with('.') || segment.contains('\\') {
                return Err(format!("Invalid storage subdirectory: {}", self.subdirectory));
            }
        }
        Ok(())
    }
}
