use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::journal::Journal;
use super::name::BlobName;
use super::traits::BlobStore;

const STAGING_DIR: &str = ".tmp";
const JOURNAL_DIR: &str = ".pending";

/// Filesystem-backed blob store.
///
/// Blobs are flat files directly under the root:
/// `{root}/{name}`, staged through `{root}/.tmp` and journaled in
/// `{root}/.pending`.
pub struct FilesystemBlobStore {
    root: PathBuf,
}

impl FilesystemBlobStore {
    /// Provision the directory layout and open the store.
    ///
    /// Idempotent; safe to call against an existing root.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(STAGING_DIR)).await?;
        fs::create_dir_all(root.join(JOURNAL_DIR)).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The write-ahead journal that belongs to this store.
    pub fn journal(&self) -> Journal {
        Journal::new(self.root.join(JOURNAL_DIR))
    }

    fn blob_path(&self, name: &BlobName) -> PathBuf {
        self.root.join(name.as_str())
    }

    fn temp_path(&self) -> PathBuf {
        self.root
            .join(STAGING_DIR)
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(&self, name: &BlobName, data: &[u8]) -> Result<(), StorageError> {
        let blob_path = self.blob_path(name);
        if fs::try_exists(&blob_path).await? {
            return Err(StorageError::AlreadyExists(name.to_string()));
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get(&self, name: &BlobName) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.blob_path(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, name: &BlobName) -> Result<bool, StorageError> {
        let blob_path = self.blob_path(name);
        match fs::metadata(&blob_path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, name: &BlobName) -> Result<bool, StorageError> {
        match fs::remove_file(self.blob_path(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, name: &BlobName) -> Result<u64, StorageError> {
        match fs::metadata(self.blob_path(name)).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(StorageError::NotFound(name.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<BlobName>, StorageError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            match BlobName::parse(&file_name) {
                Ok(name) => names.push(name),
                Err(_) => tracing::debug!(file = %file_name, "skipping unrecognized file"),
            }
        }
        names.sort();
        Ok(names)
    }
}
