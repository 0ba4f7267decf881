use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::fs;

use super::error::StorageError;
use super::name::BlobName;

const MARKER_SUFFIX: &str = ".json";

/// An operation whose side effects span the blob store and the metadata
/// store. The marker exists from before the first effect until after the
/// last one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PendingOp {
    /// A blob is being written ahead of its metadata record.
    Create { name: BlobName },
    /// A blob is being unlinked ahead of deleting `record_id`.
    Remove { name: BlobName, record_id: i32 },
}

impl PendingOp {
    pub fn name(&self) -> &BlobName {
        match self {
            Self::Create { name } | Self::Remove { name, .. } => name,
        }
    }
}

/// Directory of write-ahead markers, one file per in-flight blob name.
pub struct Journal {
    dir: PathBuf,
}

impl Journal {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn marker_path(&self, name: &BlobName) -> PathBuf {
        self.dir.join(format!("{name}{MARKER_SUFFIX}"))
    }

    /// Record `op` before touching the blob.
    pub async fn begin(&self, op: &PendingOp) -> Result<(), StorageError> {
        let body = serde_json::to_vec(op)?;
        fs::write(self.marker_path(op.name()), body).await?;
        Ok(())
    }

    /// Drop the marker for `name`. A missing marker is not an error.
    pub async fn clear(&self, name: &BlobName) -> Result<(), StorageError> {
        match fs::remove_file(self.marker_path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// All markers left behind by interrupted operations.
    ///
    /// Markers that cannot be decoded are logged and skipped.
    pub async fn pending(&self) -> Result<Vec<PendingOp>, StorageError> {
        let mut ops = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_marker = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(MARKER_SUFFIX));
            if !is_marker {
                continue;
            }

            let body = fs::read(&path).await?;
            match serde_json::from_slice::<PendingOp>(&body) {
                Ok(op) => ops.push(op),
                Err(e) => tracing::warn!(marker = %path.display(), "unreadable journal marker: {e}"),
            }
        }
        Ok(ops)
    }
}
