use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
};
use futures_util::StreamExt;
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::application::dto::ErrorResponse;
use crate::application::use_cases::UploadFileUseCase;

/// `Content-Length`, when the client sent a parsable one
fn declared_size(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// PUT /api/files/{name}
/// Upload a new file with streaming body
#[utoipa::path(
    put,
    path = "/api/files/{name}",
    tag = "files",
    params(
        ("name" = String, Path, description = "File name (single path segment)")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 204, description = "File stored"),
        (status = 400, description = "Invalid name or truncated body", body = ErrorResponse),
        (status = 409, description = "A file with this name already exists", body = ErrorResponse),
        (status = 413, description = "Body exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_handler(
    State(use_case): State<Arc<UploadFileUseCase>>,
    name: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Body,
) -> Result<StatusCode, ApiError> {
    let Path(name) = name?;
    let declared_size = declared_size(&headers);

    // Convert body to async reader
    let stream = body.into_data_stream();
    let reader = Box::pin(tokio_util::io::StreamReader::new(
        stream.map(|result| result.map_err(std::io::Error::other)),
    ));

    use_case.execute(&name, reader, declared_size).await?;

    Ok(StatusCode::NO_CONTENT)
}
