//! Parameterized asset store shared by the media and documents collections.
//!
//! An asset is a blob in the upload tree plus an `asset` row whose `url`
//! names it. Each collection is an [`AssetStore`] configured by an
//! [`AssetPolicy`].

pub mod content_type;
mod error;
mod policy;
mod reconcile;
mod service;
mod validator;

pub use error::AssetError;
pub use policy::{AssetPolicy, Collection};
pub use reconcile::ReconcileReport;
pub use service::{AssetFile, AssetPatch, AssetStore, UploadedFile};
pub use validator::{DOCUMENT_MIME_TYPES, UploadValidator};
