use super::content_type::{self, DOCX, PDF, PPTX, TEXT_PLAIN, XLSX};
use super::error::AssetError;
use super::policy::AssetPolicy;

/// MIME types accepted by the documents collection.
pub const DOCUMENT_MIME_TYPES: &[&str] = &[TEXT_PLAIN, DOCX, XLSX, PPTX, PDF];

/// Checks a declared MIME type against a collection's allow-list.
pub struct UploadValidator<'a> {
    allowed: Option<&'a [String]>,
}

impl<'a> UploadValidator<'a> {
    pub fn from_policy(policy: &'a AssetPolicy) -> Self {
        Self {
            allowed: policy.allowed_mime_types.as_deref(),
        }
    }

    /// Accept or reject `mime_type`. Parameters such as `; charset=utf-8`
    /// are ignored and the comparison is case-insensitive.
    pub fn check(&self, mime_type: &str) -> Result<(), AssetError> {
        let Some(allowed) = self.allowed else {
            return Ok(());
        };

        let essence = mime_type.split(';').next().unwrap_or_default().trim();
        if allowed.iter().any(|a| a.trim().eq_ignore_ascii_case(essence)) {
            return Ok(());
        }

        Err(AssetError::Validation(self.rejection_message()))
    }

    fn rejection_message(&self) -> String {
        let allowed = self.allowed.unwrap_or_default();
        let extensions: Option<Vec<String>> = allowed
            .iter()
            .map(|m| content_type::preferred_extension(m.trim()).map(|e| format!(".{e}")))
            .collect();

        match extensions {
            Some(exts) if !exts.is_empty() => format!(
                "Invalid file type. Only {} files are allowed",
                exts.join(", ")
            ),
            _ => format!(
                "Invalid file type. Allowed types: {}",
                allowed.join(", ")
            ),
        }
    }
}
