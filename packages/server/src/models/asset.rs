use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::asset::AssetPatch;
use crate::entity::asset;
use crate::error::AppError;

const MAX_URL_LEN: usize = 2048;

/// Response DTO for a single media or document record.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    #[schema(example = 1)]
    pub id: i32,
    /// Caller-supplied file name (media only).
    #[schema(example = "example.png")]
    pub original_name: Option<String>,
    /// Relative path of the stored file, or an external URL.
    #[schema(example = "/uploads/0b6f3c1e-8a8e-4c1d-9a51-3f8d7a1b2c3d")]
    pub url: String,
    #[schema(example = true)]
    pub is_active: bool,
    #[schema(example = false)]
    pub external: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<asset::Model> for AssetResponse {
    fn from(model: asset::Model) -> Self {
        Self {
            id: model.id,
            original_name: model.original_name,
            url: model.url,
            is_active: model.is_active,
            external: model.external,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Request body for a partial record update. Omitted fields are unchanged.
#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    /// New original name; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "renamed.png")]
    pub original_name: Option<Option<String>>,
    #[schema(example = "https://placehold.co/600x400/000000/FFFFFF/png")]
    pub url: Option<String>,
    pub is_active: Option<bool>,
    pub external: Option<bool>,
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

pub fn validate_update_asset(req: &UpdateAssetRequest) -> Result<(), AppError> {
    if let Some(ref url) = req.url {
        let url = url.trim();
        if url.is_empty() || url.len() > MAX_URL_LEN {
            return Err(AppError::Validation(format!(
                "URL must be 1-{MAX_URL_LEN} characters"
            )));
        }
    }
    Ok(())
}

impl From<UpdateAssetRequest> for AssetPatch {
    fn from(req: UpdateAssetRequest) -> Self {
        Self {
            original_name: req.original_name,
            url: req.url.map(|u| u.trim().to_string()),
            is_active: req.is_active,
            external: req.external,
        }
    }
}

/// Query for `GET /api/media/file`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MediaFileQuery {
    /// Stored file name or the record's `url`.
    pub url: Option<String>,
}

/// Query for `GET /api/documents/file`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DocumentFileQuery {
    /// Stored file name, e.g. `0b6f...2c3d.pdf`.
    pub file_name: Option<String>,
}
