use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested blob was not found.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// A blob with the generated name is already on disk.
    #[error("blob already exists: {0}")]
    AlreadyExists(String),

    /// The supplied blob name is not a safe, flat file name.
    #[error("invalid blob name: {0}")]
    InvalidName(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A journal marker could not be encoded or decoded.
    #[error("journal marker error: {0}")]
    Journal(#[from] serde_json::Error),
}
