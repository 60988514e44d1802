// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! EmbedResponse type for the POST /embed endpoint.

use crate::api::ApiError;
use serde::{Deserialize, Serialize};

/// Response body for POST /embed.
///
/// The vector length is constant for the lifetime of the process and equals
/// the configured model's output dimensionality, whichever mode is active.
///
/// # Example
/// ```json
/// { "embedding": [0.12, 0.87, 0.03] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
}

impl EmbedResponse {
    pub fn new(embedding: Vec<f32>) -> Self {
        Self { embedding }
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }

    /// Checks the vector against the expected dimensionality before it goes
    /// on the wire. Downstream storage assumes the length never varies.
    pub fn validate_dimension(&self, expected: usize) -> Result<(), ApiError> {
        if self.embedding.len() != expected {
            return Err(ApiError::InternalError(format!(
                "embedding must be exactly {} dimensions (got {})",
                expected,
                self.embedding.len()
            )));
        }
        Ok(())
    }
}
