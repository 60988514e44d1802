// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod server;

pub use embed::{embed_handler, EmbedRequest, EmbedResponse};
pub use errors::{ApiError, ErrorResponse};
pub use server::{ApiConfig, ApiServer, HealthResponse};
