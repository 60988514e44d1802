// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! EmbedRequest type for the POST /embed endpoint.

use crate::api::ApiError;
use serde::{Deserialize, Serialize};

/// Longest content string accepted, in bytes.
const MAX_CONTENT_LENGTH: usize = 8192;

/// Request body for POST /embed.
///
/// `image_url` carries the content to embed. In image deployments it is an
/// image reference; the text variant reuses the same field for arbitrary
/// text, keeping one wire shape for both. `product_id` is an opaque
/// correlation identifier: it never influences the computation and is only
/// attached to the request span for caller bookkeeping.
///
/// # Example
/// ```json
/// {
///   "image_url": "http://example.com/a.jpg",
///   "product_id": "p1"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    pub image_url: String,
    pub product_id: String,
}

impl EmbedRequest {
    /// The content string handed to the engine.
    pub fn content(&self) -> &str {
        &self.image_url
    }

    /// Validates the request beyond what deserialization enforces.
    ///
    /// Missing or mistyped fields never get here; axum rejects those with
    /// 422 before the handler runs. This catches present-but-unusable
    /// content: empty or whitespace-only strings, and oversized payloads.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.image_url.trim().is_empty() {
            return Err(ApiError::ValidationError {
                field: "image_url".to_string(),
                message: "content cannot be empty or contain only whitespace".to_string(),
            });
        }

        if self.image_url.len() > MAX_CONTENT_LENGTH {
            return Err(ApiError::ValidationError {
                field: "image_url".to_string(),
                message: format!(
                    "content cannot exceed {} characters (got {})",
                    MAX_CONTENT_LENGTH,
                    self.image_url.len()
                ),
            });
        }

        Ok(())
    }
}
