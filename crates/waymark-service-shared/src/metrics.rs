//! Prometheus metrics for the waymark service.
//!
//! This module provides:
//! - [`MetricsConfig`]: whether metrics are collected and where they are served
//! - [`init_metrics`]: install the Prometheus recorder
//! - [`metrics_handler`]: axum handler for the `/metrics` endpoint
//! - Business metric helpers for path searches and route sequencing
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use waymark_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route the exposition endpoint is mounted on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: anything but `false`/`0` enables metrics (default: enabled)
    /// - `METRICS_PATH`: endpoint path (default: `/metrics`)
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|value| !matches!(value.trim().to_ascii_lowercase().as_str(), "false" | "0"))
            .unwrap_or(true);
        let path = std::env::var("METRICS_PATH")
            .map(|value| normalize_path(&value))
            .unwrap_or_else(|_| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Router paths must be non-empty and start with `/`.
fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        "/metrics".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Install the Prometheus recorder. Call once at startup.
///
/// # Errors
///
/// Fails when metrics are disabled, when a recorder is already installed,
/// or when the exporter cannot be built.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Prometheus handle, once [`init_metrics`] has succeeded.
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Axum handler rendering the Prometheus exposition format.
pub async fn metrics_handler() -> String {
    prometheus_handle()
        .map(PrometheusHandle::render)
        .unwrap_or_else(|| "# metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => write!(f, "failed to install metrics recorder: {e}"),
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Record one grid search.
///
/// Increments `waymark_paths_searched_total{algorithm,found}` and records the
/// trace size in the `waymark_path_cells_explored{algorithm}` histogram.
pub fn record_path_searched(algorithm: &str, found: bool, explored: usize) {
    metrics::counter!(
        "waymark_paths_searched_total",
        "algorithm" => algorithm.to_string(),
        "found" => found.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "waymark_path_cells_explored",
        "algorithm" => algorithm.to_string()
    )
    .record(explored as f64);
}

/// Record a sequenced route and its number of stops.
///
/// Increments `waymark_routes_optimized_total{strategy}` and records
/// `waymark_route_stops{strategy}`.
pub fn record_route_optimized(strategy: &str, stops: usize) {
    metrics::counter!(
        "waymark_routes_optimized_total",
        "strategy" => strategy.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "waymark_route_stops",
        "strategy" => strategy.to_string()
    )
    .record(stops as f64);
}

/// Record a refused route request.
///
/// `reason` is a short label such as `unresolved_locations` or `validation_error`.
pub fn record_route_failed(reason: &str) {
    metrics::counter!(
        "waymark_routes_failed_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}
