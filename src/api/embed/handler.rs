// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed HTTP handler.

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::errors::{ApiError, ErrorResponse};
use crate::api::server::ApiServer;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, Instrument};
use uuid::Uuid;

/// POST /embed handler
///
/// # Request Body
/// ```json
/// { "image_url": "http://example.com/a.jpg", "product_id": "p1" }
/// ```
///
/// # Response Body
/// ```json
/// { "embedding": [0.1, 0.2, ...] }
/// ```
///
/// Always returns a vector of the engine's fixed dimensionality on success,
/// in both real and mock mode. Callers must consult /health to learn
/// whether vectors are meaningful or placeholder noise.
pub async fn embed_handler(
    State(server): State<Arc<ApiServer>>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "embed",
        %request_id,
        product_id = %request.product_id,
    );

    async move {
        if let Err(e) = request.validate() {
            server.metrics().record_rejected();
            info!("request rejected: {}", e);
            return Err(error_reply(&e, &request_id));
        }

        let started = Instant::now();
        match server.engine().embed(request.content()).await {
            Ok(embedding) => {
                server.metrics().record_success(started.elapsed());

                let response = EmbedResponse::new(embedding);
                response
                    .validate_dimension(server.engine().dimension())
                    .map_err(|e| {
                        error!("dimension invariant violated: {}", e);
                        error_reply(&e, &request_id)
                    })?;

                Ok(Json(response))
            }
            Err(e) => {
                // Post-load backend failures surface as request errors. No
                // silent per-call fallback to mock: that would mix
                // non-comparable vectors into one corpus.
                server.metrics().record_failure();
                error!("embedding failed: {}", e);
                Err(error_reply(
                    &ApiError::InferenceFailed(e.to_string()),
                    &request_id,
                ))
            }
        }
    }
    .instrument(span)
    .await
}

fn error_reply(error: &ApiError, request_id: &str) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(error.to_response(Some(request_id.to_string()))),
    )
}
