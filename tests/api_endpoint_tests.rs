//! API endpoint tests
//!
//! Drive the full router with `tower::ServiceExt::oneshot` over a filesystem
//! store and check status codes, headers and error bodies.


use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use futures_util::stream;
use serde_json::Value;
use tower::ServiceExt;

use test_fixtures::{test_data, TestEnvironment};

async fn send(app: &Router, method: Method, uri: &str, body: Body) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn put(app: &Router, name: &str, data: impl Into<Body>) -> Response {
    send(app, Method::PUT, &format!("/api/files/{}", name), data.into()).await
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_put_then_get_returns_bytes() {
    let env = TestEnvironment::new().await;
    let app = env.router();
    let data = test_data::sample_bytes(5000);

    let response = put(&app, "data.bin", data.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, "/api/files/data.bin", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "5000");
    assert!(response.headers().contains_key(header::LAST_MODIFIED));
    assert_eq!(body_bytes(response).await, data);
}

#[tokio::test]
async fn test_duplicate_put_conflicts() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    put(&app, "a.txt", "one").await;
    let response = put(&app, "a.txt", "two").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "already_exists");
    assert!(body["message"].is_string());

    let response = send(&app, Method::GET, "/api/files/a.txt", Body::empty()).await;
    assert_eq!(body_bytes(response).await, b"one");
}

#[tokio::test]
async fn test_get_and_delete_missing_return_404() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    for method in [Method::GET, Method::DELETE] {
        let response = send(&app, method, "/api/files/nope.txt", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "not_found");
    }
}

#[tokio::test]
async fn test_delete_returns_204_and_removes() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    put(&app, "gone.txt", "bye").await;

    let response = send(&app, Method::DELETE, "/api/files/gone.txt", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, "/api/files/gone.txt", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_names_return_400() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    // Percent-encoded separators and dot segments decode into the path parameter
    for encoded in ["..", "a%2Fb", "%2E%2E", "a%5Cb", "bad%00name"] {
        let response = put(&app, encoded, "x").await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for {}",
            encoded
        );
        assert_eq!(body_json(response).await["error"], "invalid_name");
    }
}

#[tokio::test]
async fn test_undecodable_name_returns_json_400() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    for method in [Method::PUT, Method::GET, Method::DELETE] {
        let response = send(&app, method.clone(), "/api/files/%FF", Body::from("x")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", method);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_json(response).await["error"], "invalid_name");
    }
}

#[tokio::test]
async fn test_failed_body_read_returns_400_and_leaves_no_trace() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"abc")),
        Err(std::io::Error::from(std::io::ErrorKind::ConnectionReset)),
    ];
    let response = put(&app, "reset.bin", Body::from_stream(stream::iter(chunks))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "incomplete_body");
    assert_eq!(env.temp_entries(), 0);

    let response = send(&app, Method::GET, "/api/files/reset.bin", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_json_array() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    let response = send(&app, Method::GET, "/api/files", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));

    put(&app, "b.txt", "b").await;
    put(&app, "a.txt", "a").await;

    let response = send(&app, Method::GET, "/api/files", Body::empty()).await;
    assert_eq!(
        body_json(response).await,
        serde_json::json!(["a.txt", "b.txt"])
    );
}

#[tokio::test]
async fn test_oversize_body_returns_413() {
    let env = TestEnvironment::with_max_upload(100).await;
    let app = env.router();

    let response = put(&app, "big.bin", test_data::sample_bytes(101)).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["error"], "too_large");

    let response = send(&app, Method::GET, "/api/files/big.bin", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_declared_oversize_rejected_without_body() {
    let env = TestEnvironment::with_max_upload(100).await;
    let app = env.router();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/api/files/big.bin")
                .header(header::CONTENT_LENGTH, "1000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_empty_file_roundtrip() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    let response = put(&app, "empty", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, "/api/files/empty", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "0");
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_health_endpoints() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    let response = send(&app, Method::GET, "/api/health", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"status": "ok", "message": "Server is running"})
    );

    let response = send(&app, Method::GET, "/api/health/ready", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ready");
}

#[tokio::test]
async fn test_readiness_fails_when_storage_disappears() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    std::fs::remove_dir_all(env.storage_dir.path().join("files")).unwrap();

    let response = send(&app, Method::GET, "/api/health/ready", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "not_ready");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    let response = send(&app, Method::GET, "/api-docs/openapi.json", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = body_json(response).await;
    assert!(doc["paths"]["/api/files/{name}"]["put"].is_object());
    assert!(doc["paths"]["/api/files"]["get"].is_object());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let env = TestEnvironment::new().await;
    let app = env.router();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}
