// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod monitoring;
pub mod telemetry;
pub mod version;

// Re-export main types
pub use api::{ApiConfig, ApiError, ApiServer, EmbedRequest, EmbedResponse, ErrorResponse, HealthResponse};
pub use config::ServiceConfig;
pub use embeddings::{
    EmbedError, EmbeddingEngine, LoadError, MockEmbedder, OnnxTextEncoder, DEFAULT_DIMENSION,
};
pub use monitoring::ServiceMetrics;
