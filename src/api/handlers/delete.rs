use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::application::dto::ErrorResponse;
use crate::application::use_cases::DeleteFileUseCase;

/// DELETE /api/files/{name}
#[utoipa::path(
    delete,
    path = "/api/files/{name}",
    tag = "files",
    params(
        ("name" = String, Path, description = "File name (single path segment)")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_handler(
    State(use_case): State<Arc<DeleteFileUseCase>>,
    name: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(name) = name?;
    use_case.execute(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}
