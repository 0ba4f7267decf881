use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::{StatusCode, header};
use axum::response::Response;

use crate::asset::UploadedFile;
use crate::error::AppError;

pub fn upload_body_limit(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes)
}

/// Buffer the `file` part of a multipart upload. Other parts are ignored.
///
/// Returns `None` when the request carries no `file` part.
pub async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, AppError> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().map(|s| s.to_string());
        let mime_type = field.content_type().map(|s| s.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        file = Some(UploadedFile {
            bytes: bytes.to_vec(),
            original_name,
            mime_type,
        });
    }

    Ok(file)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Build a whole-body file response.
pub fn file_response(
    bytes: Vec<u8>,
    content_type: &str,
    file_name: &str,
) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(file_name),
        )
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    format!("inline; filename=\"{ascii_name}\"")
}
