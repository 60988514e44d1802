// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! The engine: one write-once cell holding either a real encoder or the
//! synthetic fallback.
//!
//! Mode is decided exactly once, during startup, before the HTTP server
//! accepts traffic. There is no transition back to the real backend after
//! falling into mock mode within a process run, and no per-request state.
//! The engine is owned by whoever constructs it and handed to the transport
//! layer as a shared reference; nothing here is a process global.

use super::mock::MockEmbedder;
use super::onnx_model::{EmbedError, OnnxTextEncoder};
use std::sync::Arc;

#[derive(Debug)]
enum Backend {
    Onnx(Arc<OnnxTextEncoder>),
    Mock(MockEmbedder),
}

/// Produces a numeric vector for arbitrary input content.
///
/// Safe to call from many concurrent requests: the backend choice is made
/// before any concurrent access begins and is read-only afterwards.
#[derive(Debug)]
pub struct EmbeddingEngine {
    backend: Backend,
    dimension: usize,
}

impl EmbeddingEngine {
    /// Engine backed by a loaded ONNX encoder.
    pub fn with_backend(encoder: OnnxTextEncoder) -> Self {
        let dimension = encoder.dimension();
        Self {
            backend: Backend::Onnx(Arc::new(encoder)),
            dimension,
        }
    }

    /// Engine running on the synthetic fallback.
    pub fn mock(dimension: usize) -> Self {
        Self {
            backend: Backend::Mock(MockEmbedder::new(dimension)),
            dimension,
        }
    }

    /// True when the active mode is the synthetic fallback.
    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock(_))
    }

    /// Model name for health reporting: the loaded model, or "mock".
    pub fn reported_model(&self) -> &str {
        match &self.backend {
            Backend::Onnx(encoder) => encoder.model_name(),
            Backend::Mock(_) => "mock",
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns a vector of `dimension()` floats for `content`.
    ///
    /// Real mode is deterministic and may block for the duration of
    /// inference; mock mode returns fresh uniform noise near-instantly.
    /// Backend unavailability is never an error here, it was resolved into
    /// the mode at startup. Runtime inference failures do propagate.
    pub async fn embed(&self, content: &str) -> Result<Vec<f32>, EmbedError> {
        match &self.backend {
            Backend::Onnx(encoder) => encoder.embed(content).await,
            Backend::Mock(mock) => Ok(mock.generate()),
        }
    }
}
