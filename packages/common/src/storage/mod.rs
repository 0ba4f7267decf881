mod error;
mod name;
mod traits;

pub mod filesystem;
pub mod journal;

pub use error::StorageError;
pub use name::{BlobName, normalize_extension};
pub use traits::BlobStore;
