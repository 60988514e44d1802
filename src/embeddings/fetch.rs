// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! Model file resolution.
//!
//! Looks for model.onnx and tokenizer.json under the local models
//! directory first, then falls back to fetching them from the Hugging Face
//! hub. Hub downloads land in the hf-hub cache and can take seconds on a
//! cold start; this runs once, before request traffic begins.

use hf_hub::api::sync::Api;
use std::path::{Path, PathBuf};
use tracing::info;

use super::onnx_model::LoadError;

/// Hub organization hosting the sentence transformer checkpoints.
const HF_ORG: &str = "sentence-transformers";
/// Path of the ONNX export inside the hub repository.
const HF_MODEL_FILE: &str = "onnx/model.onnx";
const HF_TOKENIZER_FILE: &str = "tokenizer.json";

/// Resolved on-disk locations of the encoder assets.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub model: PathBuf,
    pub tokenizer: PathBuf,
}

/// Resolves the model and tokenizer files for `model_name`.
///
/// Local layout takes precedence: `{models_dir}/{model_name}-onnx/model.onnx`
/// plus `tokenizer.json` next to it. When either file is missing the pair is
/// fetched from `sentence-transformers/{model_name}` on the hub.
pub async fn resolve_model_files(
    model_name: &str,
    models_dir: &Path,
) -> Result<ModelFiles, LoadError> {
    let local_dir = models_dir.join(format!("{model_name}-onnx"));
    let local = ModelFiles {
        model: local_dir.join("model.onnx"),
        tokenizer: local_dir.join("tokenizer.json"),
    };

    if local.model.exists() && local.tokenizer.exists() {
        info!("Using local model files from {}", local_dir.display());
        return Ok(local);
    }

    let repo_id = format!("{HF_ORG}/{model_name}");
    info!("Fetching {} from the Hugging Face hub", repo_id);

    // The hub client is blocking; keep it off the async runtime.
    let files = tokio::task::spawn_blocking(move || -> Result<ModelFiles, LoadError> {
        let api = Api::new().map_err(|e| LoadError::Download(e.to_string()))?;
        let repo = api.model(repo_id);
        let model = repo
            .get(HF_MODEL_FILE)
            .map_err(|e| LoadError::Download(e.to_string()))?;
        let tokenizer = repo
            .get(HF_TOKENIZER_FILE)
            .map_err(|e| LoadError::Download(e.to_string()))?;
        Ok(ModelFiles { model, tokenizer })
    })
    .await
    .map_err(|e| LoadError::Download(format!("download task failed: {e}")))??;

    info!("✅ Model files fetched: {}", files.model.display());
    Ok(files)
}
