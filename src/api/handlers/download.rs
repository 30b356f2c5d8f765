use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode},
    response::Response,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::api::errors::ApiError;
use crate::application::dto::ErrorResponse;
use crate::application::use_cases::DownloadFileUseCase;

/// RFC 7231 IMF-fixdate
fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// GET /api/files/{name}
/// Download file with streaming response
#[utoipa::path(
    get,
    path = "/api/files/{name}",
    tag = "files",
    params(
        ("name" = String, Path, description = "File name (single path segment)")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn download_handler(
    State(use_case): State<Arc<DownloadFileUseCase>>,
    name: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(name) = name?;
    let (metadata, reader) = use_case.execute(&name).await?;

    // Convert reader to stream
    let stream = ReaderStream::new(reader);
    let body = Body::from_stream(stream);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_LENGTH, metadata.size_bytes.to_string())
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::LAST_MODIFIED, http_date(metadata.updated_at))
        .body(body)
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal_error()
        })?;

    Ok(response)
}
