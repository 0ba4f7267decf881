use async_trait::async_trait;

use super::error::StorageError;
use super::name::BlobName;

/// Name-addressed blob storage.
///
/// Names are generated by the caller. Stores never deduplicate: two `put`
/// calls with identical bytes under two names keep two blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store the whole buffer under `name`. Fails if the name is taken.
    async fn put(&self, name: &BlobName, data: &[u8]) -> Result<(), StorageError>;

    /// Retrieve all bytes of a blob.
    async fn get(&self, name: &BlobName) -> Result<Vec<u8>, StorageError>;

    /// Check whether a blob exists.
    async fn exists(&self, name: &BlobName) -> Result<bool, StorageError>;

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, name: &BlobName) -> Result<bool, StorageError>;

    /// Get the size of a blob in bytes.
    async fn size(&self, name: &BlobName) -> Result<u64, StorageError>;

    /// List every blob held directly by this store.
    async fn list(&self) -> Result<Vec<BlobName>, StorageError>;
}
