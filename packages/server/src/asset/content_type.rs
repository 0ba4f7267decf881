//! Fixed extension to content-type table for stored documents.

use std::path::Path;

use super::error::AssetError;

pub const TEXT_PLAIN: &str = "text/plain";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PPTX: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const PDF: &str = "application/pdf";

/// Preferred extension first for each type.
const TABLE: &[(&str, &str)] = &[
    ("txt", TEXT_PLAIN),
    ("docx", DOCX),
    ("doc", DOCX),
    ("xlsx", XLSX),
    ("xls", XLSX),
    ("pptx", PPTX),
    ("ppt", PPTX),
    ("pdf", PDF),
];

/// Content type for `file_name`, keyed on its extension.
pub fn resolve(file_name: &str) -> Result<&'static str, AssetError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, content_type)| *content_type)
        .ok_or_else(|| {
            if ext.is_empty() {
                AssetError::UnsupportedExtension("file has no extension".into())
            } else {
                AssetError::UnsupportedExtension(format!(".{ext}"))
            }
        })
}

/// Extension to store a file of `content_type` under, if the table knows it.
pub fn preferred_extension(content_type: &str) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(_, known)| known.eq_ignore_ascii_case(content_type))
        .map(|(ext, _)| *ext)
}
