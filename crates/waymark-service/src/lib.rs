//! Waymark HTTP service.
//!
//! # Endpoints
//!
//! - `POST /api/v1/find-path` - Grid search with the exploration trace
//! - `POST /api/v1/optimize-route` - Geocode addresses and sequence them
//! - `GET /metrics` - Prometheus metrics endpoint (path set by [`MetricsConfig::path`])
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use waymark_lib::{plan_path, plan_route, Error as LibError, OptimizedRoute, SearchResult};
use waymark_service_shared::{
    from_lib_error, health_live, health_ready, metrics_handler, record_path_searched,
    record_route_failed, record_route_optimized, request_span, track_requests, AppState,
    FindPathRequest, MetricsConfig, OptimizeRouteRequest, ProblemDetails, RequestId, Validate,
};

/// HTTP response: either the payload or an RFC 9457 problem.
#[derive(Debug)]
pub enum ApiResponse<T> {
    Success(T),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiResponse::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            ApiResponse::Error(problem) => problem.into_response(),
        }
    }
}

/// Build the service router over `state` with default metrics settings.
pub fn app(state: AppState) -> Router {
    router(state, &MetricsConfig::default())
}

/// Build the service router, mounting the metrics endpoint at `metrics.path`.
pub fn router(state: AppState, metrics: &MetricsConfig) -> Router {
    Router::new()
        .route("/api/v1/find-path", post(find_path_handler))
        .route("/api/v1/optimize-route", post(optimize_route_handler))
        .route(&metrics.path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
        .layer(middleware::from_fn(track_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handle `POST /api/v1/find-path`.
///
/// An unreachable goal is a normal 200 response with `found: false`.
async fn find_path_handler(
    request_id: RequestId,
    payload: Result<Json<FindPathRequest>, JsonRejection>,
) -> ApiResponse<SearchResult> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(request_id = %request_id, error = %rejection, "rejected find-path body");
            return ApiResponse::Error(ProblemDetails::bad_request(
                rejection.body_text(),
                request_id.as_str(),
            ));
        }
    };

    let algorithm = request.strategy();
    info!(
        request_id = %request_id,
        algorithm = %algorithm,
        rows = request.grid.len(),
        start = %request.start,
        end = %request.end,
        "handling find-path request"
    );

    if let Err(problem) = request.validate(request_id.as_str()) {
        return ApiResponse::Error(*problem);
    }

    match plan_path(&request.into_path_request()) {
        Ok(result) => {
            record_path_searched(algorithm.as_str(), result.found, result.explored_count());
            info!(
                request_id = %request_id,
                found = result.found,
                steps = result.step_count(),
                explored = result.explored_count(),
                "path search finished"
            );
            ApiResponse::Success(result)
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "find-path request refused");
            ApiResponse::Error(from_lib_error(&e, request_id.as_str()))
        }
    }
}

/// Handle `POST /api/v1/optimize-route`.
///
/// Geocoding and leg lookups block on HTTP, so planning runs on the
/// blocking pool.
async fn optimize_route_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<OptimizeRouteRequest>, JsonRejection>,
) -> ApiResponse<OptimizedRoute> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            record_route_failed("validation_error");
            return ApiResponse::Error(ProblemDetails::bad_request(
                rejection.body_text(),
                request_id.as_str(),
            ));
        }
    };

    info!(
        request_id = %request_id,
        addresses = request.addresses.len(),
        strategy = %request.strategy(),
        "handling optimize-route request"
    );

    if let Err(problem) = request.validate(request_id.as_str()) {
        record_route_failed("validation_error");
        return ApiResponse::Error(*problem);
    }

    let route_request = request.into_route_request();
    let strategy = route_request.strategy;
    let resolver = state.resolver();
    let provider = state.provider();

    let outcome = tokio::task::spawn_blocking(move || {
        plan_route(&route_request, resolver.as_ref(), provider.as_ref())
    })
    .await;

    match outcome {
        Ok(Ok(route)) => {
            record_route_optimized(strategy.as_str(), route.route.len());
            info!(
                request_id = %request_id,
                stops = route.route.len(),
                total_distance = route.total_distance,
                "route optimized"
            );
            ApiResponse::Success(route)
        }
        Ok(Err(e)) => {
            let reason = match &e {
                LibError::UnresolvedLocations { .. } => "unresolved_locations",
                LibError::EmptyLocationList => "validation_error",
                _ => "internal_error",
            };
            record_route_failed(reason);
            warn!(request_id = %request_id, reason, error = %e, "route request refused");
            ApiResponse::Error(from_lib_error(&e, request_id.as_str()))
        }
        Err(join_error) => {
            record_route_failed("internal_error");
            error!(request_id = %request_id, error = %join_error, "route planning task failed");
            ApiResponse::Error(ProblemDetails::internal_error(
                "route planning did not complete",
                request_id.as_str(),
            ))
        }
    }
}
