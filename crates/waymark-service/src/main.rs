//! Waymark HTTP microservice.
//!
//! Serves grid pathfinding and delivery route sequencing over a JSON API.
//! See [`waymark_service::app`] for the endpoint list.
//!
//! # Configuration
//!
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `METRICS_ENABLED` - Set to `false` to disable the Prometheus recorder
//! - `METRICS_PATH` - Path of the metrics endpoint (default: /metrics)
//! - `WAYMARK_OFFLINE` - Measure legs as great-circle lines instead of OSRM
//! - `WAYMARK_NOMINATIM_URL` / `WAYMARK_OSRM_URL` - Provider endpoints

use std::env;
use std::net::SocketAddr;

use tracing::{error, info};

use waymark_service::router;
use waymark_service_shared::{init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (reads LOG_FORMAT from environment)
    let logging_config = LoggingConfig::from_env().with_service("waymark");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    // Blocking HTTP clients own an internal runtime, so providers are built
    // before ours starts.
    let state = AppState::from_env().map_err(|e| {
        error!(error = %e, "failed to build providers");
        e
    })?;

    info!(
        port = port,
        routing_mode = state.routing_mode().as_str(),
        metrics_path = %metrics_config.path,
        "starting waymark service"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        info!(addr = %addr, "listening on");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router(state, &metrics_config)).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
