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
    AssetResponse, DocumentFileQuery, UpdateAssetRequest, validate_update_asset,
};
use crate::state::AppState;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Documents",
    operation_id = "uploadDocument",
    summary = "Upload a document",
    description = "Accepts .txt, .docx, .xlsx, .pptx and .pdf files in the `file` multipart field.",
    request_body(content_type = "multipart/form-data", description = "Multipart form with a `file` field"),
    responses(
        (status = 201, description = "Document uploaded successfully", body = AssetResponse),
        (status = 400, description = "Missing file or disallowed type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 413, description = "Upload exceeds the size limit (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let file = read_file_field(multipart).await?;
    let record = state.documents.create(file).await?;
    Ok((StatusCode::CREATED, Json(AssetResponse::from(record))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Documents",
    operation_id = "listDocuments",
    summary = "Get all documents",
    responses((status = 200, description = "List of documents", body = [AssetResponse])),
)]
#[instrument(skip(state))]
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssetResponse>>, AppError> {
    let records = state.documents.find_all().await?;
    Ok(Json(records.into_iter().map(AssetResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/file",
    tag = "Documents",
    operation_id = "getDocumentFile",
    summary = "Get document file",
    description = "Returns the raw bytes with a content type resolved from the file extension.",
    params(DocumentFileQuery),
    responses(
        (status = 200, description = "File content"),
        (status = 400, description = "Missing name or unsupported type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_document_file(
    State(state): State<AppState>,
    Query(query): Query<DocumentFileQuery>,
) -> Result<Response, AppError> {
    let file_name = query
        .file_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Validation("fileName query parameter is required".into()))?;

    let file = state.documents.get_file(&file_name).await?;
    let content_type = file.content_type.unwrap_or(FALLBACK_CONTENT_TYPE);
    file_response(file.bytes, content_type, file.name.as_str())
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Documents",
    operation_id = "getDocument",
    summary = "Get document by ID",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document found", body = AssetResponse),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_document(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<AssetResponse>, AppError> {
    Ok(Json(state.documents.find_one(id).await?.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Documents",
    operation_id = "updateDocument",
    summary = "Update document record",
    params(("id" = i32, Path, description = "Document ID")),
    request_body = UpdateAssetRequest,
    responses(
        (status = 200, description = "Document updated", body = AssetResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn update_document(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateAssetRequest>,
) -> Result<Json<AssetResponse>, AppError> {
    validate_update_asset(&payload)?;
    Ok(Json(state.documents.update(id, payload.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Documents",
    operation_id = "deleteDocument",
    summary = "Delete document record",
    description = "Deletes the record and returns it. By default the stored file is retained.",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted", body = AssetResponse),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_document(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<AssetResponse>, AppError> {
    Ok(Json(state.documents.remove(id).await?.into()))
}
