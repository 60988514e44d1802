// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! ONNX text encoder (all-MiniLM-L6-v2).
//!
//! Wraps an ONNX Runtime session around the sentence transformer model:
//! BERT tokenization, inference, attention-mask-weighted mean pooling over
//! the token embeddings, 384-dimensional output.

use ndarray::{Array2, ArrayViewD, Axis};
use ort::execution_providers::CPU;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

use super::fetch;
use super::DEFAULT_DIMENSION;

/// Maximum tokens per input. Longer content is truncated by the tokenizer.
const MAX_SEQUENCE_LENGTH: usize = 256;

/// Errors surfaced while acquiring the real encoding backend.
///
/// These stop at the startup sequence, which logs and degrades to mock mode.
/// Request handlers never see them.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model download failed: {0}")]
    Download(String),
    #[error("model file not found: {0}")]
    ModelNotFound(PathBuf),
    #[error("failed to load tokenizer: {0}")]
    Tokenizer(String),
    #[error("failed to initialize ONNX session: {0}")]
    Session(#[from] ort::Error),
    #[error("failed to prepare encoder inputs: {0}")]
    Input(String),
    #[error("model output has shape {shape:?}, expected [batch, seq, {expected}]")]
    OutputShape { shape: Vec<usize>, expected: usize },
}

/// Errors surfaced by `embed` after a backend has been accepted.
///
/// These propagate to the request caller as a service error. There is no
/// per-call fallback to the synthetic generator: once a real backend is
/// active, a failing request fails loudly instead of returning noise.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("tokenization failed: {0}")]
    Tokenization(String),
    #[error("inference failed: {0}")]
    Inference(#[from] ort::Error),
    #[error("failed to prepare encoder inputs: {0}")]
    Input(String),
    #[error("backend produced a {got}-dimensional vector, expected {expected}")]
    Dimension { got: usize, expected: usize },
}

/// Real encoding backend.
///
/// The session sits behind a `Mutex` so the handle can be shared across
/// request tasks; inference is serialized. Everything else is read-only
/// after load.
pub struct OnnxTextEncoder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
}

impl std::fmt::Debug for OnnxTextEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxTextEncoder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OnnxTextEncoder {
    /// Acquires the backend for `model_name`, resolving (and if necessary
    /// downloading) the model files first. Invoked at most once per process
    /// lifetime, before request traffic begins.
    pub async fn load(model_name: &str, models_dir: &Path) -> Result<Self, LoadError> {
        let files = fetch::resolve_model_files(model_name, models_dir).await?;
        Self::from_files(model_name, &files.model, &files.tokenizer)
    }

    /// Builds the encoder from files already on disk.
    ///
    /// Runs one probe inference and rejects the model unless it emits
    /// `[batch, seq, 384]` token embeddings.
    pub fn from_files(
        model_name: &str,
        model_path: &Path,
        tokenizer_path: &Path,
    ) -> Result<Self, LoadError> {
        if !model_path.exists() {
            return Err(LoadError::ModelNotFound(model_path.to_path_buf()));
        }
        if !tokenizer_path.exists() {
            return Err(LoadError::ModelNotFound(tokenizer_path.to_path_buf()));
        }

        let mut session = Session::builder()?
            .with_execution_providers([CPU::default().build()])
            .map_err(ort::Error::from)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::from)?
            .with_intra_threads(4)
            .map_err(ort::Error::from)?
            .commit_from_file(model_path)?;

        let mut tokenizer =
            Tokenizer::from_file(tokenizer_path).map_err(|e| LoadError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| LoadError::Tokenizer(e.to_string()))?;

        let dimension = validate_output_shape(&mut session, &tokenizer)?;
        info!("✅ ONNX encoder ready: {} ({} dimensions)", model_name, dimension);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name: model_name.to_string(),
            dimension,
        })
    }

    /// Encodes `text` into a single sentence vector.
    ///
    /// Deterministic: identical input yields an identical vector for the
    /// lifetime of the loaded model. Blocks the calling task for the
    /// duration of inference.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbedError::Tokenization(e.to_string()))?;

        let attention: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let (input_ids, attention_mask, token_type_ids) =
            encoder_inputs(&encoding).map_err(|e| EmbedError::Input(e.to_string()))?;

        let mut session = self.session.lock().unwrap();
        let outputs = session.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids)?,
            "attention_mask" => Value::from_array(attention_mask)?,
            "token_type_ids" => Value::from_array(token_type_ids)?
        ])?;

        // Token-level output: [batch, seq_len, hidden_dim]
        let output = outputs[0].try_extract_array::<f32>()?;
        let embedding = mean_pool(output.index_axis(Axis(0), 0), &attention);

        if embedding.len() != self.dimension {
            return Err(EmbedError::Dimension {
                got: embedding.len(),
                expected: self.dimension,
            });
        }

        Ok(embedding)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Builds the three model input tensors from one encoding, batch size 1.
fn encoder_inputs(
    encoding: &tokenizers::Encoding,
) -> Result<(Array2<i64>, Array2<i64>, Array2<i64>), ndarray::ShapeError> {
    let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();
    let token_type_ids = vec![0i64; input_ids.len()];

    let len = input_ids.len();
    Ok((
        Array2::from_shape_vec((1, len), input_ids)?,
        Array2::from_shape_vec((1, len), attention_mask)?,
        Array2::from_shape_vec((1, len), token_type_ids)?,
    ))
}

/// Mean pooling over the sequence dimension, weighted by the attention mask
/// so padding tokens contribute nothing.
fn mean_pool(token_embeddings: ArrayViewD<'_, f32>, attention_mask: &[i64]) -> Vec<f32> {
    let seq_len = token_embeddings.shape()[0];
    let hidden_dim = token_embeddings.shape()[1];

    let mut pooled = vec![0.0f32; hidden_dim];
    let mut mask_sum = 0.0f32;

    for i in 0..seq_len {
        let mask_value = attention_mask.get(i).copied().unwrap_or(0) as f32;
        mask_sum += mask_value;
        for j in 0..hidden_dim {
            pooled[j] += token_embeddings[[i, j]] * mask_value;
        }
    }

    let denom = mask_sum.max(1e-9);
    for value in &mut pooled {
        *value /= denom;
    }

    pooled
}

/// Probe inference: accept the model only if it emits `[batch, seq, 384]`.
fn validate_output_shape(session: &mut Session, tokenizer: &Tokenizer) -> Result<usize, LoadError> {
    let encoding = tokenizer
        .encode("validation probe", true)
        .map_err(|e| LoadError::Tokenizer(e.to_string()))?;
    let (input_ids, attention_mask, token_type_ids) =
        encoder_inputs(&encoding).map_err(|e| LoadError::Input(e.to_string()))?;

    let outputs = session.run(ort::inputs![
        "input_ids" => Value::from_array(input_ids)?,
        "attention_mask" => Value::from_array(attention_mask)?,
        "token_type_ids" => Value::from_array(token_type_ids)?
    ])?;

    let output = outputs[0].try_extract_array::<f32>()?;
    let shape = output.shape();

    if shape.len() != 3 || shape[2] != DEFAULT_DIMENSION {
        return Err(LoadError::OutputShape {
            shape: shape.to_vec(),
            expected: DEFAULT_DIMENSION,
        });
    }

    Ok(shape[2])
}
