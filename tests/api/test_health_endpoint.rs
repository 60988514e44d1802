// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! GET /health reports the active engine mode.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use resys_embed_node::{
    api::{ApiConfig, ApiServer, HealthResponse},
    embeddings::{EmbeddingEngine, DEFAULT_DIMENSION},
};
use std::sync::Arc;
use tower::util::ServiceExt;

fn mock_app() -> Router {
    let engine = Arc::new(EmbeddingEngine::mock(DEFAULT_DIMENSION));
    let server = Arc::new(ApiServer::new(ApiConfig::default(), engine).unwrap());
    ApiServer::create_router(server)
}

#[tokio::test]
async fn test_health_reports_mock_mode() {
    let app = mock_app();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&body_bytes).unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.model, "mock");
}

#[tokio::test]
async fn test_health_rejects_post() {
    let app = mock_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
