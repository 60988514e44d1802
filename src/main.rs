// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use resys_embed_node::{
    api::{ApiConfig, ApiServer},
    config::ServiceConfig,
    embeddings::{EmbeddingEngine, OnnxTextEncoder, DEFAULT_DIMENSION},
    telemetry, version,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = ServiceConfig::from_env();
    telemetry::init(&config);

    info!("🚀 Starting {}", version::get_version_string());

    // Mode is decided here, once, before the server accepts traffic. A
    // failed backend load degrades to mock instead of failing the process;
    // /health reports which mode won.
    let engine = if config.force_mock {
        info!("🎭 Mock embeddings forced by configuration (FORCE_MOCK_EMBEDDINGS)");
        EmbeddingEngine::mock(DEFAULT_DIMENSION)
    } else {
        info!("🧠 Loading embedding model: {}", config.model_name);
        match OnnxTextEncoder::load(&config.model_name, &config.models_dir).await {
            Ok(encoder) => {
                info!(
                    "✅ Embedding model loaded: {} ({} dimensions)",
                    encoder.model_name(),
                    encoder.dimension()
                );
                EmbeddingEngine::with_backend(encoder)
            }
            Err(e) => {
                warn!("⚠️  Failed to load embedding model: {}", e);
                warn!("   Falling back to mock embeddings; /health will report \"mock\"");
                EmbeddingEngine::mock(DEFAULT_DIMENSION)
            }
        }
    };

    if engine.is_mock() {
        warn!("Embedding vectors are placeholder noise until a real model loads on restart");
    }

    let api_config = ApiConfig {
        listen_addr: config.listen_addr(),
        path_prefix: config.path_prefix.clone(),
    };
    let server = Arc::new(ApiServer::new(api_config, Arc::new(engine))?);

    info!("🌐 API endpoints:");
    let prefix = config.path_prefix.as_deref().unwrap_or("");
    info!("   Embed:   POST http://localhost:{}{}/embed", config.api_port, prefix);
    info!("   Health:  GET  http://localhost:{}{}/health", config.api_port, prefix);
    info!("   Metrics: GET  http://localhost:{}{}/metrics", config.api_port, prefix);

    server.start().await?;

    telemetry::shutdown();
    info!("👋 Goodbye!");
    Ok(())
}
