// src/monitoring/metrics.rs - Metrics collection and export

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Request-level metrics exposed at GET /metrics.
///
/// Each server instance owns its registry; nothing registers against the
/// process-wide default, so tests can spin up servers freely.
pub struct ServiceMetrics {
    registry: Registry,
    embed_requests: IntCounterVec,
    embed_duration: Histogram,
    mock_mode: IntGauge,
}

impl ServiceMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let embed_requests = IntCounterVec::new(
            Opts::new("embed_requests_total", "Total embed requests by outcome"),
            &["outcome"],
        )?;
        let embed_duration = Histogram::with_opts(HistogramOpts::new(
            "embed_duration_seconds",
            "Embedding generation latency in seconds",
        ))?;
        let mock_mode = IntGauge::new(
            "embedding_mock_mode",
            "1 when the engine runs the synthetic fallback, 0 for a real backend",
        )?;

        registry.register(Box::new(embed_requests.clone()))?;
        registry.register(Box::new(embed_duration.clone()))?;
        registry.register(Box::new(mock_mode.clone()))?;

        Ok(Self {
            registry,
            embed_requests,
            embed_duration,
            mock_mode,
        })
    }

    pub fn set_mock_mode(&self, mock: bool) {
        self.mock_mode.set(if mock { 1 } else { 0 });
    }

    pub fn record_success(&self, elapsed: Duration) {
        self.embed_requests.with_label_values(&["ok"]).inc();
        self.embed_duration.observe(elapsed.as_secs_f64());
    }

    pub fn record_rejected(&self) {
        self.embed_requests.with_label_values(&["rejected"]).inc();
    }

    pub fn record_failure(&self) {
        self.embed_requests.with_label_values(&["failed"]).inc();
    }

    /// Prometheus text exposition of everything in the registry.
    pub fn export(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
