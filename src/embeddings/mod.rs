// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! Embedding Engine
//!
//! Produces a fixed-length vector for arbitrary input content. At startup
//! the service tries to acquire a real ONNX encoder; when that fails (or is
//! disabled via FORCE_MOCK_EMBEDDINGS) the engine runs on a synthetic
//! generator instead. Requests never observe the difference structurally,
//! only through the mode reported by /health.

pub mod engine;
pub mod fetch;
pub mod mock;
pub mod onnx_model;

pub use engine::EmbeddingEngine;
pub use fetch::{resolve_model_files, ModelFiles};
pub use mock::MockEmbedder;
pub use onnx_model::{EmbedError, LoadError, OnnxTextEncoder};

/// Output dimensionality of the reference model (all-MiniLM-L6-v2).
/// Every vector this service emits has this length, in both modes, so
/// downstream storage schemas can rely on it.
pub const DEFAULT_DIMENSION: usize = 384;
