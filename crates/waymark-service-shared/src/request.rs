//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use waymark_lib::{Cell, PathRequest, RouteRequest, RouteStrategy, SearchStrategy};

use crate::ProblemDetails;

/// Largest grid accepted by `/api/v1/find-path`, in cells.
pub const MAX_GRID_CELLS: usize = 250_000;

/// Largest address list accepted by `/api/v1/optimize-route`.
pub const MAX_ADDRESSES: usize = 50;

/// Validation trait for request types.
///
/// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body of `POST /api/v1/find-path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindPathRequest {
    /// Rows of `0` (open) / `1` (wall).
    pub grid: Vec<Vec<u8>>,
    pub start: Cell,
    pub end: Cell,
    /// `astar`, `dijkstra` or `greedy`; anything else means `astar`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

impl FindPathRequest {
    pub fn strategy(&self) -> SearchStrategy {
        self.algorithm
            .as_deref()
            .map(SearchStrategy::from_name)
            .unwrap_or_default()
    }

    pub fn into_path_request(self) -> PathRequest {
        let algorithm = self.strategy();
        PathRequest::new(self.grid, self.start, self.end, algorithm)
    }
}

impl Validate for FindPathRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        let width = self.grid.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'grid' field must contain at least one non-empty row",
                request_id,
            )));
        }

        let cells = width.saturating_mul(self.grid.len());
        if cells > MAX_GRID_CELLS {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The 'grid' field has {cells} cells; at most {MAX_GRID_CELLS} are allowed"),
                request_id,
            )));
        }

        Ok(())
    }
}

/// Body of `POST /api/v1/optimize-route`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRouteRequest {
    pub addresses: Vec<String>,
    /// Only `nearest_neighbor` exists; other names fall back to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

impl OptimizeRouteRequest {
    pub fn strategy(&self) -> RouteStrategy {
        self.algorithm
            .as_deref()
            .map(RouteStrategy::from_name)
            .unwrap_or_default()
    }

    pub fn into_route_request(self) -> RouteRequest {
        let strategy = self.strategy();
        RouteRequest {
            addresses: self
                .addresses
                .into_iter()
                .map(|address| address.trim().to_string())
                .collect(),
            strategy,
        }
    }
}

impl Validate for OptimizeRouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.addresses.is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "No addresses provided",
                request_id,
            )));
        }

        if self.addresses.len() > MAX_ADDRESSES {
            return Err(Box::new(ProblemDetails::bad_request(
                format!(
                    "The 'addresses' field has {} entries; at most {MAX_ADDRESSES} are allowed",
                    self.addresses.len()
                ),
                request_id,
            )));
        }

        if let Some(position) = self.addresses.iter().position(|a| a.trim().is_empty()) {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("Address at position {position} is empty"),
                request_id,
            )));
        }

        Ok(())
    }
}
