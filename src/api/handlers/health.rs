use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

use crate::application::ports::BlobStore;

const READINESS_TIMEOUT: Duration = Duration::from_secs(2);

/// Basic health check response
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    fn new(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
        }
    }
}

/// GET /api/health
/// Liveness check, touches no storage
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::new("ok", "Server is running"))
}

/// GET /api/health/ready
/// Readiness check against the storage backend
#[utoipa::path(
    get,
    path = "/api/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Storage is reachable", body = HealthResponse),
        (status = 503, description = "Storage is not reachable", body = HealthResponse)
    )
)]
pub async fn readiness_handler(
    State(blob_store): State<Arc<dyn BlobStore>>,
) -> (StatusCode, Json<HealthResponse>) {
    match tokio::time::timeout(READINESS_TIMEOUT, blob_store.ping()).await {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(HealthResponse::new("ready", "Storage is reachable")),
        ),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness_check_failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new("not_ready", "Storage is unavailable")),
            )
        }
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::new(
                "not_ready",
                "Storage check timed out after 2 seconds",
            )),
        ),
    }
}
