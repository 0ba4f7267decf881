use common::storage::StorageError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    /// Missing or invalid caller input.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The stored file's extension has no known content type.
    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(String),

    #[error(transparent)]
    Storage(StorageError),

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl From<StorageError> for AssetError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => AssetError::NotFound("File not found".into()),
            StorageError::InvalidName(msg) => AssetError::Validation(format!("Invalid file name: {msg}")),
            other => AssetError::Storage(other),
        }
    }
}
