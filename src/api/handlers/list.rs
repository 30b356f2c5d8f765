use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::application::dto::ErrorResponse;
use crate::application::use_cases::ListFilesUseCase;

/// GET /api/files
/// List stored file names in lexicographic order
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "File names", body = Vec<String>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_handler(
    State(use_case): State<Arc<ListFilesUseCase>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = use_case.execute().await?;
    Ok(Json(names))
}
