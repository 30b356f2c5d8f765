use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    delete_handler, download_handler, health_handler, list_handler, readiness_handler,
    upload_handler,
};
use crate::api::middleware::metrics;
use crate::api::openapi::openapi_handler;
use crate::application::ports::BlobStore;
use crate::application::use_cases::{
    DeleteFileUseCase, DownloadFileUseCase, ListFilesUseCase, UploadFileUseCase,
};

/// Application state container
#[derive(Clone)]
pub struct AppState {
    pub blob_store: Arc<dyn BlobStore>,
    pub upload_use_case: Arc<UploadFileUseCase>,
    pub download_use_case: Arc<DownloadFileUseCase>,
    pub list_use_case: Arc<ListFilesUseCase>,
    pub delete_use_case: Arc<DeleteFileUseCase>,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/health/ready",
            get(readiness_handler).with_state(Arc::clone(&state.blob_store)),
        )
        .route(
            "/api/files",
            get(list_handler).with_state(Arc::clone(&state.list_use_case)),
        )
        .route(
            "/api/files/{name}",
            put(upload_handler).with_state(Arc::clone(&state.upload_use_case)),
        )
        .route(
            "/api/files/{name}",
            get(download_handler).with_state(Arc::clone(&state.download_use_case)),
        )
        .route(
            "/api/files/{name}",
            delete(delete_handler).with_state(Arc::clone(&state.delete_use_case)),
        )
        .route("/api-docs/openapi.json", get(openapi_handler))
        // Uploads are bounded by the use case while streaming
        .layer(DefaultBodyLimit::disable())
        .layer(axum_middleware::from_fn(metrics::metrics_middleware))
}
