// Version information for the ReSys embedding node

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-18";

/// Supported features in this build
pub const FEATURES: &[&str] = &[
    "onnx-embeddings",
    "mock-fallback",
    "prometheus-metrics",
    "otlp-telemetry",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("ReSys Embed Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
