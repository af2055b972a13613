//! Shared HTTP infrastructure for the waymark service.
//!
//! - [`AppState`]: geocoder and leg provider shared by handlers
//! - [`health`]: liveness/readiness probes
//! - [`ProblemDetails`]: RFC 9457 error responses
//! - [`metrics`]: Prometheus recorder and business metrics
//! - [`logging`]: structured logging setup
//! - [`middleware`]: request ids and HTTP metrics
//! - Request types with validation for each endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; all path and route logic lives in `waymark-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate parameters                                      │
//! │  - Call waymark-lib (plan_path / plan_route)                │
//! │  - Format response or ProblemDetails                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! [`test_utils`] provides an offline [`AppState`]. Enable the `test-utils`
//! feature to use it from dependent crates.

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_path_searched, record_route_failed,
    record_route_optimized, MetricsConfig, MetricsError,
};
pub use middleware::{
    extract_or_generate_request_id, request_span, track_requests, RequestId, REQUEST_ID_HEADER,
};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_UNRESOLVED_LOCATIONS,
};
pub use request::{
    FindPathRequest, OptimizeRouteRequest, Validate, MAX_ADDRESSES, MAX_GRID_CELLS,
};
pub use state::{AppState, AppStateError, RoutingMode};
