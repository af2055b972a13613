//! Waymark library entry points.
//!
//! This crate exposes the grid search engine (A*, Dijkstra, greedy
//! best-first) with its exploration trace, the nearest-neighbour route
//! sequencer, great-circle distance, and the provider traits used to feed
//! the sequencer with geocoded locations and road distances. Higher-level
//! consumers (CLI, HTTP service) should only depend on the functions
//! exported here instead of reimplementing behavior.

pub mod error;
pub mod geo;
pub mod grid;
pub mod location;
pub mod matrix;
pub mod planning;
pub mod providers;
pub mod search;
pub mod sequencer;

pub use error::{Error, Result};
pub use geo::{great_circle_distance, Coordinates, EARTH_RADIUS_KM};
pub use grid::{Cell, CellState, Grid};
pub use location::{collect_resolved, Location, Resolution, ResolutionFailure};
pub use matrix::{DistanceMatrix, GeometryCache, Polyline};
pub use planning::{plan_path, plan_route, search_grid, PathRequest, RouteRequest};
pub use providers::{
    build_route_matrix, resolve_all, Leg, LocationResolver, NominatimResolver, OsrmProvider,
    PathGeometryProvider, ProviderConfig, StaticResolver, StraightLineProvider,
};
pub use search::{find_path, manhattan, SearchResult, SearchStrategy};
pub use sequencer::{
    nearest_neighbor_order, optimize_route, route_distance, OptimizedRoute, RouteStop,
    RouteStrategy,
};
