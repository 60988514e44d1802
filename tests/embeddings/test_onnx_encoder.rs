// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! Real-backend tests.
//!
//! The load-failure paths run everywhere. The inference tests need the
//! actual model files on disk and are #[ignore]d; fetch the files by
//! starting the service once with a writable MODELS_DIR, then run
//! `cargo test -- --ignored`.

use resys_embed_node::embeddings::{EmbeddingEngine, LoadError, OnnxTextEncoder};
use std::path::Path;

const MODEL_PATH: &str = "./models/all-MiniLM-L6-v2-onnx/model.onnx";
const TOKENIZER_PATH: &str = "./models/all-MiniLM-L6-v2-onnx/tokenizer.json";

#[test]
fn test_from_files_reports_missing_files_explicitly() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.onnx");
    let tokenizer = dir.path().join("tokenizer.json");

    let result = OnnxTextEncoder::from_files("all-MiniLM-L6-v2", &model, &tokenizer);

    // The startup sequence matches on this to decide log-and-degrade.
    match result {
        Err(LoadError::ModelNotFound(path)) => assert_eq!(path, model),
        other => panic!("expected ModelNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_from_files_requires_tokenizer_too() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.onnx");
    std::fs::write(&model, b"not a real model").unwrap();
    let tokenizer = dir.path().join("tokenizer.json");

    let result = OnnxTextEncoder::from_files("all-MiniLM-L6-v2", &model, &tokenizer);

    assert!(matches!(result, Err(LoadError::ModelNotFound(_))));
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_real_backend_dimension_and_name() {
    let encoder = OnnxTextEncoder::from_files(
        "all-MiniLM-L6-v2",
        Path::new(MODEL_PATH),
        Path::new(TOKENIZER_PATH),
    )
    .unwrap();

    assert_eq!(encoder.dimension(), 384);
    assert_eq!(encoder.model_name(), "all-MiniLM-L6-v2");
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_real_backend_is_deterministic() {
    let encoder = OnnxTextEncoder::from_files(
        "all-MiniLM-L6-v2",
        Path::new(MODEL_PATH),
        Path::new(TOKENIZER_PATH),
    )
    .unwrap();

    let first = encoder.embed("waterproof hiking boots").await.unwrap();
    let second = encoder.embed("waterproof hiking boots").await.unwrap();

    assert_eq!(first, second);

    let different = encoder.embed("cast iron skillet").await.unwrap();
    assert_ne!(first, different);
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_engine_with_real_backend_reports_model_name() {
    let encoder = OnnxTextEncoder::from_files(
        "all-MiniLM-L6-v2",
        Path::new(MODEL_PATH),
        Path::new(TOKENIZER_PATH),
    )
    .unwrap();

    let engine = EmbeddingEngine::with_backend(encoder);

    assert!(!engine.is_mock());
    assert_eq!(engine.reported_model(), "all-MiniLM-L6-v2");

    let vector = engine.embed("bamboo cutting board").await.unwrap();
    assert_eq!(vector.len(), engine.dimension());
}
