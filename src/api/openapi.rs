use axum::response::Json;
use utoipa::OpenApi;

use crate::api::handlers::health::HealthResponse;
use crate::application::dto::ErrorResponse;

/// OpenAPI specification for the just_files API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "just_files API",
        version = "1.0.0",
        description = "Named file storage with atomic create and streaming transfer"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::health::readiness_handler,
        crate::api::handlers::list::list_handler,
        crate::api::handlers::upload::upload_handler,
        crate::api::handlers::download::download_handler,
        crate::api::handlers::delete::delete_handler,
    ),
    components(schemas(ErrorResponse, HealthResponse)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "files", description = "File storage operations")
    )
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
