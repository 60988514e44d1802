// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end tests for POST /embed with the engine in mock mode.
//!
//! Mock mode keeps these hermetic: no model files, no network. The
//! contract under test is the one downstream consumers rely on: a fixed
//! 384-length vector on every success, placeholder values in [0, 1), and
//! structured validation errors.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use resys_embed_node::{
    api::{ApiConfig, ApiServer},
    embeddings::{EmbeddingEngine, DEFAULT_DIMENSION},
};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

fn mock_app() -> Router {
    let engine = Arc::new(EmbeddingEngine::mock(DEFAULT_DIMENSION));
    let server = Arc::new(
        ApiServer::new(ApiConfig::default(), engine).expect("server construction should succeed"),
    );
    ApiServer::create_router(server)
}

fn embed_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/embed")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn test_embed_returns_384_floats_in_unit_interval() {
    let app = mock_app();

    let response = app
        .oneshot(embed_request(
            r#"{"image_url": "http://example.com/a.jpg", "product_id": "p1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    let embedding = json["embedding"].as_array().expect("embedding array");
    assert_eq!(embedding.len(), DEFAULT_DIMENSION);

    for value in embedding {
        let v = value.as_f64().expect("float element");
        assert!((0.0..1.0).contains(&v), "mock value out of [0, 1): {}", v);
    }
}

#[tokio::test]
async fn test_mock_vectors_differ_between_identical_requests() {
    let app = mock_app();
    let body = r#"{"image_url": "http://example.com/a.jpg", "product_id": "p1"}"#;

    let first = response_json(app.clone().oneshot(embed_request(body)).await.unwrap()).await;
    let second = response_json(app.oneshot(embed_request(body)).await.unwrap()).await;

    // Placeholder noise is randomized per call; identical vectors would
    // make mock output look cacheable.
    assert_ne!(first["embedding"], second["embedding"]);
}

#[tokio::test]
async fn test_text_content_is_embedded_too() {
    let app = mock_app();

    let response = app
        .oneshot(embed_request(
            r#"{"image_url": "ergonomic office chair with lumbar support", "product_id": "p7"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["embedding"].as_array().unwrap().len(), DEFAULT_DIMENSION);
}

#[tokio::test]
async fn test_missing_field_is_422() {
    let app = mock_app();

    let response = app
        .oneshot(embed_request(r#"{"image_url": "http://example.com/a.jpg"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_mistyped_field_is_422() {
    let app = mock_app();

    let response = app
        .oneshot(embed_request(r#"{"image_url": 42, "product_id": "p1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_whitespace_content_is_422_with_structured_body() {
    let app = mock_app();

    let response = app
        .oneshot(embed_request(r#"{"image_url": "   ", "product_id": "p1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = response_json(response).await;
    assert_eq!(json["error_type"], "validation_error");
    assert!(json["request_id"].is_string());
    assert_eq!(json["details"]["field"], "image_url");
}

#[tokio::test]
async fn test_concurrent_requests_all_satisfy_dimension_invariant() {
    let app = mock_app();

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = format!(
                    r#"{{"image_url": "http://example.com/{i}.jpg", "product_id": "p{i}"}}"#
                );
                app.oneshot(embed_request(&body)).await.unwrap()
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["embedding"].as_array().unwrap().len(), DEFAULT_DIMENSION);
    }
}
