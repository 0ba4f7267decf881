pub mod documents;
pub mod media;
pub mod transfer;
