// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! Process configuration.
//!
//! Everything comes from environment variables, read once at startup. There
//! is no hot reload; changing a value means restarting the process.

use std::env;
use std::path::PathBuf;

/// Reference model. 384-dimensional output.
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP listen port (API_PORT).
    pub api_port: u16,
    /// Optional route prefix (PATH_PREFIX), normalized to "/prefix" form.
    pub path_prefix: Option<String>,
    /// Embedding model name (EMBEDDING_MODEL).
    pub model_name: String,
    /// Local model file cache (MODELS_DIR).
    pub models_dir: PathBuf,
    /// Skip backend loading entirely and run on the synthetic fallback
    /// (FORCE_MOCK_EMBEDDINGS).
    pub force_mock: bool,
    /// OTLP collector endpoint (OTEL_EXPORTER_OTLP_ENDPOINT). Absent means
    /// local-only logging.
    pub otlp_endpoint: Option<String>,
    /// Service name attached to exported traces (OTEL_SERVICE_NAME).
    pub service_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_port: 8080,
            path_prefix: None,
            model_name: DEFAULT_MODEL.to_string(),
            models_dir: PathBuf::from("./models"),
            force_mock: false,
            otlp_endpoint: None,
            service_name: "resys-embed-node".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.api_port);

        let path_prefix = env::var("PATH_PREFIX")
            .ok()
            .and_then(|p| normalize_prefix(&p));

        let model_name =
            env::var("EMBEDDING_MODEL").unwrap_or_else(|_| defaults.model_name.clone());

        let models_dir = env::var("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| defaults.models_dir.clone());

        let force_mock = env::var("FORCE_MOCK_EMBEDDINGS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let otlp_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let service_name =
            env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| defaults.service_name.clone());

        Self {
            api_port,
            path_prefix,
            model_name,
            models_dir,
            force_mock,
            otlp_endpoint,
            service_name,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.api_port)
    }
}

/// Normalizes a raw prefix to "/prefix" form. Empty or "/" means no prefix.
fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}
