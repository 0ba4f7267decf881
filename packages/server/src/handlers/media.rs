use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::handlers::transfer::{file_response, read_file_field};
use crate::models::asset::{
    AssetResponse, MediaFileQuery, UpdateAssetRequest, validate_update_asset,
};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Media",
    operation_id = "uploadMedia",
    summary = "Upload a media file",
    description = "Stores the `file` multipart field under a generated name. Any file type is accepted.",
    request_body(content_type = "multipart/form-data", description = "Multipart form with a `file` field"),
    responses(
        (status = 201, description = "File uploaded successfully", body = AssetResponse),
        (status = 400, description = "Missing file (VALIDATION_ERROR)", body = ErrorBody),
        (status = 413, description = "Upload exceeds the size limit (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_media(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let file = read_file_field(multipart).await?;
    let record = state.media.create(file).await?;
    Ok((StatusCode::CREATED, Json(AssetResponse::from(record))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Media",
    operation_id = "listMedia",
    summary = "Get all media files",
    responses((status = 200, description = "List of media files", body = [AssetResponse])),
)]
#[instrument(skip(state))]
pub async fn list_media(State(state): State<AppState>) -> Result<Json<Vec<AssetResponse>>, AppError> {
    let records = state.media.find_all().await?;
    Ok(Json(records.into_iter().map(AssetResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/file",
    tag = "Media",
    operation_id = "getMediaFile",
    summary = "Get file from server",
    description = "Returns the raw bytes. The content type is guessed from the trailing path segment.",
    params(MediaFileQuery),
    responses(
        (status = 200, description = "File content"),
        (status = 400, description = "Missing or invalid path (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_media_file(
    State(state): State<AppState>,
    Query(query): Query<MediaFileQuery>,
) -> Result<Response, AppError> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Path is required".into()))?;

    let file = state.media.get_file(&url).await?;
    let content_type = mime_guess::from_path(file.name.as_str()).first_or_octet_stream();
    file_response(file.bytes, content_type.as_ref(), file.name.as_str())
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Media",
    operation_id = "getMedia",
    summary = "Get media by ID",
    params(("id" = i32, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media found", body = AssetResponse),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<AssetResponse>, AppError> {
    Ok(Json(state.media.find_one(id).await?.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Media",
    operation_id = "updateMedia",
    summary = "Update media record",
    description = "Partially updates the record. A new `url` is stored as given.",
    params(("id" = i32, Path, description = "Media ID")),
    request_body = UpdateAssetRequest,
    responses(
        (status = 200, description = "Media updated", body = AssetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateAssetRequest>,
) -> Result<Json<AssetResponse>, AppError> {
    validate_update_asset(&payload)?;
    Ok(Json(state.media.update(id, payload.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Media",
    operation_id = "deleteMedia",
    summary = "Delete media record",
    description = "Deletes the stored file, then the record. Returns the deleted record.",
    params(("id" = i32, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media deleted", body = AssetResponse),
        (status = 404, description = "Media not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<AssetResponse>, AppError> {
    Ok(Json(state.media.remove(id).await?.into()))
}
