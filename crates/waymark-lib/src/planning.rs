//! Request-level orchestration.
//!
//! This module provides:
//! - [`PathRequest`] / [`plan_path`] - validate a raw grid request and run the search engine
//! - [`search_grid`] - the same validation and search over an already-built [`Grid`]
//! - [`RouteRequest`] / [`plan_route`] - resolve addresses, build the matrix and sequence stops
//!
//! Callers (CLI, HTTP service) should go through these entry points rather
//! than wiring the lower-level pieces themselves.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use crate::location::collect_resolved;
use crate::providers::{build_route_matrix, resolve_all, LocationResolver, PathGeometryProvider};
use crate::search::{find_path, SearchResult, SearchStrategy};
use crate::sequencer::{optimize_route, OptimizedRoute, RouteStrategy};

/// Grid search request in its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRequest {
    /// Rows of `0` (passable) / `1` (wall).
    pub grid: Vec<Vec<u8>>,
    pub start: Cell,
    pub end: Cell,
    #[serde(default)]
    pub algorithm: SearchStrategy,
}

impl PathRequest {
    pub fn new(grid: Vec<Vec<u8>>, start: Cell, end: Cell, algorithm: SearchStrategy) -> Self {
        Self {
            grid,
            start,
            end,
            algorithm,
        }
    }
}

/// Validate `request` and run the search.
///
/// An unreachable goal is not an error: the result has `found == false`
/// and still carries the exploration trace.
pub fn plan_path(request: &PathRequest) -> Result<SearchResult> {
    // Step 1: Build the grid
    let grid = Grid::from_rows(&request.grid)?;

    // Step 2: Validate and search
    search_grid(&grid, request.start, request.end, request.algorithm)
}

/// Search an already-built grid after validating the endpoints.
///
/// Rejects an empty grid and endpoints outside it; everything else is left
/// to [`find_path`].
pub fn search_grid(
    grid: &Grid,
    start: Cell,
    end: Cell,
    algorithm: SearchStrategy,
) -> Result<SearchResult> {
    if grid.is_empty() {
        return Err(Error::EmptyGrid);
    }
    ensure_in_bounds(grid, "start", start)?;
    ensure_in_bounds(grid, "end", end)?;

    let result = find_path(grid, start, end, algorithm);

    info!(
        algorithm = %algorithm,
        width = grid.width(),
        height = grid.height(),
        found = result.found,
        steps = result.step_count(),
        explored = result.explored_count(),
        "path planned"
    );
    Ok(result)
}

fn ensure_in_bounds(grid: &Grid, role: &'static str, cell: Cell) -> Result<()> {
    if grid.contains(cell) {
        return Ok(());
    }
    Err(Error::CellOutOfBounds {
        role,
        x: cell.x,
        y: cell.y,
        width: grid.width(),
        height: grid.height(),
    })
}

/// Route sequencing request: free-form addresses in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub addresses: Vec<String>,
    #[serde(default)]
    pub strategy: RouteStrategy,
}

impl RouteRequest {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
            strategy: RouteStrategy::default(),
        }
    }
}

/// Resolve, measure and sequence the addresses in `request`.
///
/// Resolution is all-or-nothing: if any address fails, no route is built
/// and the error lists every failure. Provider failures for individual
/// legs fall back to great-circle distance.
pub fn plan_route<R, P>(request: &RouteRequest, resolver: &R, provider: &P) -> Result<OptimizedRoute>
where
    R: LocationResolver + ?Sized,
    P: PathGeometryProvider + ?Sized,
{
    if request.addresses.is_empty() {
        return Err(Error::EmptyLocationList);
    }

    // Step 1: Resolve every address
    let locations = collect_resolved(resolve_all(resolver, &request.addresses))?;
    debug!(locations = locations.len(), "addresses resolved");

    // Step 2: Measure every ordered pair
    let (matrix, geometries) = build_route_matrix(provider, &locations);

    // Step 3: Sequence
    let route = optimize_route(&locations, Some(&matrix), Some(&geometries))?;

    info!(
        strategy = %request.strategy,
        stops = route.route.len(),
        total_distance = route.total_distance,
        "route planned"
    );
    Ok(route)
}
