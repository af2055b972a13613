//! RFC 9457 Problem Details for HTTP APIs.
//!
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use waymark_lib::{Error as LibError, ResolutionFailure};

/// Problem type URI for malformed or invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for route requests with addresses that could not be geocoded.
pub const PROBLEM_UNRESOLVED_LOCATIONS: &str = "/problems/unresolved-locations";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use axum::http::StatusCode;
/// use waymark_service_shared::{ProblemDetails, PROBLEM_INVALID_REQUEST};
///
/// let problem = ProblemDetails::new(PROBLEM_INVALID_REQUEST, "Invalid Request", StatusCode::BAD_REQUEST)
///     .with_detail("start cell (9, 0) is outside the 3x3 grid")
///     .with_request_id("req-12345");
/// assert_eq!(problem.status, 400);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    pub title: String,

    pub status: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Identifies this occurrence; carries the request id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Addresses that failed to resolve, each with its reason.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<ResolutionFailure>,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            failed: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 for input that cannot be processed.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_INVALID_REQUEST, "Invalid Request", StatusCode::BAD_REQUEST)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// 400 listing every address that could not be resolved.
    pub fn unresolved_locations(failures: &[ResolutionFailure], request_id: impl Into<String>) -> Self {
        let mut problem = Self::new(
            PROBLEM_UNRESOLVED_LOCATIONS,
            "Unresolved Locations",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(format!(
            "Could not geocode {} address(es); no route was computed",
            failures.len()
        ))
        .with_request_id(request_id);
        problem.failed = failures.to_vec();
        problem
    }

    /// 500 for failures on our side.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.detail.as_deref().unwrap_or(""))
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = Json(&self).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_CONTENT_TYPE));
        *response.status_mut() = status;
        response
    }
}

/// Convert a library error into the matching problem.
///
/// Input validation errors become 400 invalid-request, unresolved addresses
/// become 400 unresolved-locations, anything else is a 500.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::UnresolvedLocations { failures } => {
            ProblemDetails::unresolved_locations(failures, request_id)
        }
        LibError::EmptyGrid
        | LibError::RaggedGrid { .. }
        | LibError::InvalidCellValue { .. }
        | LibError::InvalidGlyph { .. }
        | LibError::CellOutOfBounds { .. }
        | LibError::EmptyLocationList
        | LibError::MatrixNotSquare { .. }
        | LibError::InvalidDistance { .. }
        | LibError::MatrixSizeMismatch { .. } => {
            ProblemDetails::bad_request(error.to_string(), request_id)
        }
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_fields() {
        let problem = ProblemDetails::bad_request("Invalid JSON", "req-123");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.type_uri, PROBLEM_INVALID_REQUEST);
        assert_eq!(problem.instance.as_deref(), Some("req-123"));
    }

    #[test]
    fn serialization_omits_empty_fields() {
        let problem = ProblemDetails::internal_error("boom", "req-test");
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["type"], "/problems/internal-error");
        assert_eq!(json["status"], 500);
        assert!(json.get("failed").is_none());
    }

    #[test]
    fn unresolved_locations_lists_failures() {
        let error = LibError::UnresolvedLocations {
            failures: vec![ResolutionFailure::new("Atlantis", "Address not found")],
        };
        let problem = from_lib_error(&error, "req-geo");
        assert_eq!(problem.type_uri, PROBLEM_UNRESOLVED_LOCATIONS);
        assert_eq!(problem.status, 400);

        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["failed"][0]["address"], "Atlantis");
        assert_eq!(json["failed"][0]["error"], "Address not found");
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let error = LibError::CellOutOfBounds {
            role: "end",
            x: 5,
            y: 5,
            width: 3,
            height: 3,
        };
        let problem = from_lib_error(&error, "req-grid");
        assert_eq!(problem.status, 400);
        assert!(problem.detail.unwrap().contains("end cell (5, 5)"));

        assert_eq!(from_lib_error(&LibError::EmptyGrid, "r").status, 400);
        assert_eq!(from_lib_error(&LibError::EmptyLocationList, "r").status, 400);
    }

    #[test]
    fn other_errors_are_internal() {
        let error = LibError::RoutingService {
            message: "NoRoute".to_string(),
        };
        assert_eq!(from_lib_error(&error, "req").status, 500);
    }

    #[test]
    fn response_uses_problem_content_type() {
        let response = ProblemDetails::bad_request("nope", "req").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
    }
}
