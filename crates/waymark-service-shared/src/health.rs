//! Health check handlers for Kubernetes probes.
//!
//! `/health/live` answers as long as the process serves requests;
//! `/health/ready` also reports how route legs are measured.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Body of both health probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `ok` when the probe answers.
    pub status: String,
    pub service: String,
    pub version: String,
    /// `road` or `straight_line` (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_mode: Option<String>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            routing_mode: None,
        }
    }

    pub fn ready(service: &str, version: &str, routing_mode: &str) -> Self {
        Self {
            routing_mode: Some(routing_mode.to_string()),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"waymark-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe. Providers are constructed before the listener binds, so
/// a running service is ready.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"waymark-service-shared","version":"0.1.0","routing_mode":"road"}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let status = HealthStatus::ready(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        state.routing_mode().as_str(),
    );
    (StatusCode::OK, Json(status))
}
