// Copyright (c) 2025 ReSys
// SPDX-License-Identifier: BUSL-1.1

//! Logging and trace export.
//!
//! With the `telemetry` feature compiled in and OTEL_EXPORTER_OTLP_ENDPOINT
//! configured, spans are exported to the collector over OTLP alongside
//! local fmt logging. In every other case the service logs locally and
//! nothing leaves the process.
//!
//! **Feature flag: `telemetry`**
//! - Enable with: `cargo build --features telemetry`
//! - Disabled by default to keep the dependency tree small

use crate::config::ServiceConfig;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "telemetry")]
use opentelemetry::{global, KeyValue};
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    trace::{self, RandomIdGenerator, Sampler},
    Resource,
};
#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber. Call once, before any other
/// subsystem starts logging.
pub fn init(config: &ServiceConfig) {
    #[cfg(feature = "telemetry")]
    {
        if let Some(endpoint) = config.otlp_endpoint.as_deref() {
            match init_otlp(config, endpoint) {
                Ok(()) => return,
                Err(e) => {
                    eprintln!("OpenTelemetry init failed, using local logging: {e}");
                }
            }
        }
    }

    #[cfg(not(feature = "telemetry"))]
    if config.otlp_endpoint.is_some() {
        eprintln!(
            "OTEL_EXPORTER_OTLP_ENDPOINT is set but the telemetry feature is not \
             compiled in; using local logging"
        );
    }

    init_fmt();
}

/// Local-only fallback: fmt subscriber with RUST_LOG filtering.
fn init_fmt() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[cfg(feature = "telemetry")]
fn init_otlp(
    config: &ServiceConfig,
    endpoint: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(
            trace::config()
                .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(Resource::new(vec![
                    KeyValue::new("service.name", config.service_name.clone()),
                    KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                ])),
        )
        .install_batch(opentelemetry_sdk::runtime::Tokio)?;

    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry_layer)
        .init();

    tracing::info!(
        endpoint = %endpoint,
        service_name = %config.service_name,
        "OpenTelemetry tracing initialized"
    );

    Ok(())
}

/// Flushes remaining spans on graceful shutdown.
#[cfg(feature = "telemetry")]
pub fn shutdown() {
    global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown() {}
