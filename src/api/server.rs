// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::embed::embed_handler;
use crate::embeddings::EmbeddingEngine;
use crate::monitoring::ServiceMetrics;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: String,
    /// Optional route prefix, e.g. "/ml". Empty means routes at the root.
    pub path_prefix: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            path_prefix: None,
        }
    }
}

/// Response body for GET /health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Name of the active model, or "mock" when running on the fallback.
    pub model: String,
}

/// HTTP transport around the embedding engine.
///
/// Owns nothing the engine needs; it receives a shared engine built by the
/// startup sequence and serves it.
pub struct ApiServer {
    config: ApiConfig,
    engine: Arc<EmbeddingEngine>,
    metrics: Arc<ServiceMetrics>,
}

impl ApiServer {
    pub fn new(config: ApiConfig, engine: Arc<EmbeddingEngine>) -> anyhow::Result<Self> {
        let metrics = Arc::new(ServiceMetrics::new()?);
        metrics.set_mock_mode(engine.is_mock());

        Ok(Self {
            config,
            engine,
            metrics,
        })
    }

    pub fn engine(&self) -> &EmbeddingEngine {
        &self.engine
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    pub fn create_router(server: Arc<Self>) -> Router {
        let routes = Router::new()
            .route("/embed", post(embed_handler))
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(server.clone());

        match server.config.path_prefix.as_deref() {
            Some(prefix) => Router::new().nest(prefix, routes),
            None => routes,
        }
    }

    /// Binds the listener and serves until ctrl-c.
    pub async fn start(self: Arc<Self>) -> anyhow::Result<()> {
        let addr: SocketAddr = self.config.listen_addr.parse()?;
        let app = Self::create_router(self.clone());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("API server listening on {}", addr);
        if let Some(prefix) = self.config.path_prefix.as_deref() {
            tracing::info!("Routes nested under path prefix {}", prefix);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {}", e);
    }
    tracing::info!("⏹️  Shutdown signal received");
}

async fn health_handler(State(server): State<Arc<ApiServer>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: server.engine().reported_model().to_string(),
    })
}

async fn metrics_handler(State(server): State<Arc<ApiServer>>) -> impl IntoResponse {
    match server.metrics().export() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("metrics export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
