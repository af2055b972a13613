//! Visiting-order construction over a distance matrix.
//!
//! The only strategy is nearest-unvisited-next: start at the first location
//! and repeatedly move to the closest location not yet visited. It is a
//! greedy O(N²) construction with no tour improvement.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::location::Location;
use crate::matrix::{DistanceMatrix, GeometryCache, Polyline};

/// Supported route sequencing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    /// Nearest-unvisited-next greedy construction.
    #[default]
    NearestNeighbor,
}

impl RouteStrategy {
    /// Resolve a strategy by name. Every name maps to the nearest-neighbour
    /// heuristic, the only one implemented.
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase();
        if !matches!(normalized.as_str(), "nearest_neighbor" | "nearest-neighbor" | "") {
            debug!(requested = %normalized, "unknown route strategy, using nearest_neighbor");
        }
        RouteStrategy::NearestNeighbor
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteStrategy::NearestNeighbor => "nearest_neighbor",
        }
    }
}

impl fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A location tagged with its 1-based position in the visiting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    #[serde(flatten)]
    pub location: Location,
    pub order: usize,
}

/// Sequenced route returned by [`optimize_route`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OptimizedRoute {
    pub route: Vec<RouteStop>,
    /// Sum of leg distances in kilometres, rounded to two decimals.
    pub total_distance: f64,
    /// One polyline per consecutive leg, in visiting order.
    pub geometries: Vec<Polyline>,
}

impl OptimizedRoute {
    /// Number of legs travelled.
    pub fn leg_count(&self) -> usize {
        self.route.len().saturating_sub(1)
    }
}

/// Sequence `locations` into a visiting order.
///
/// When `matrix` is `None` a great-circle matrix is built from the
/// coordinates. Geometry for a leg comes from `geometries` when present,
/// otherwise a straight two-point segment is emitted.
pub fn optimize_route(
    locations: &[Location],
    matrix: Option<&DistanceMatrix>,
    geometries: Option<&GeometryCache>,
) -> Result<OptimizedRoute> {
    match locations {
        [] => return Ok(OptimizedRoute::default()),
        [only] => {
            return Ok(OptimizedRoute {
                route: vec![RouteStop {
                    location: only.clone(),
                    order: 1,
                }],
                total_distance: 0.0,
                geometries: Vec::new(),
            })
        }
        _ => {}
    }

    let matrix = match matrix {
        Some(matrix) if matrix.len() != locations.len() => {
            return Err(Error::MatrixSizeMismatch {
                matrix: matrix.len(),
                locations: locations.len(),
            });
        }
        Some(matrix) => Cow::Borrowed(matrix),
        None => Cow::Owned(DistanceMatrix::from_locations(locations)),
    };

    let order = nearest_neighbor_order(&matrix);
    let route = build_route(locations, &matrix, geometries, &order);

    debug!(
        stops = route.route.len(),
        total_distance = route.total_distance,
        "route sequenced"
    );
    Ok(route)
}

/// Visiting order produced by the nearest-unvisited-next heuristic.
///
/// Starts at index 0; ties go to the lowest index. Visits every index
/// exactly once.
pub fn nearest_neighbor_order(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.len();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    visited[current] = true;
    order.push(current);

    for _ in 1..n {
        let mut nearest: Option<(usize, f64)> = None;
        for candidate in (0..n).filter(|&idx| !visited[idx]) {
            let distance = matrix.get(current, candidate);
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((candidate, distance));
            }
        }

        let Some((next, _)) = nearest else {
            break;
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Sum of consecutive leg distances along `order`, unrounded.
pub fn route_distance(matrix: &DistanceMatrix, order: &[usize]) -> f64 {
    order
        .windows(2)
        .map(|leg| matrix.get(leg[0], leg[1]))
        .sum()
}

fn build_route(
    locations: &[Location],
    matrix: &DistanceMatrix,
    geometries: Option<&GeometryCache>,
    order: &[usize],
) -> OptimizedRoute {
    let route = order
        .iter()
        .enumerate()
        .map(|(position, &idx)| RouteStop {
            location: locations[idx].clone(),
            order: position + 1,
        })
        .collect();

    let legs = order
        .windows(2)
        .map(|leg| {
            let (from, to) = (leg[0], leg[1]);
            geometries
                .and_then(|cache| cache.get(from, to))
                .cloned()
                .unwrap_or_else(|| {
                    Polyline::straight(locations[from].coordinates(), locations[to].coordinates())
                })
        })
        .collect();

    OptimizedRoute {
        route,
        total_distance: round_to_cents(route_distance(matrix, order)),
        geometries: legs,
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    fn stops(count: usize) -> Vec<Location> {
        (0..count)
            .map(|i| Location::new(format!("Stop {i}"), i as f64 * 0.01, 0.0))
            .collect()
    }

    #[test]
    fn empty_input_gives_empty_route() {
        let route = optimize_route(&[], None, None).unwrap();
        assert!(route.route.is_empty());
        assert_eq!(route.total_distance, 0.0);
        assert!(route.geometries.is_empty());
    }

    #[test]
    fn single_location_has_zero_distance() {
        let locations = stops(1);
        let route = optimize_route(&locations, None, None).unwrap();
        assert_eq!(route.route.len(), 1);
        assert_eq!(route.route[0].order, 1);
        assert_eq!(route.total_distance, 0.0);
        assert!(route.geometries.is_empty());
    }

    #[test]
    fn two_locations_use_the_only_order() {
        let locations = stops(2);
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 7.125], vec![3.0, 0.0]]).unwrap();
        let route = optimize_route(&locations, Some(&matrix), None).unwrap();

        let orders: Vec<(&str, usize)> = route
            .route
            .iter()
            .map(|stop| (stop.location.address.as_str(), stop.order))
            .collect();
        assert_eq!(orders, vec![("Stop 0", 1), ("Stop 1", 2)]);
        assert_eq!(route.total_distance, 7.13);
        assert_eq!(route.geometries.len(), 1);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 4.0, 2.0, 2.0],
            vec![4.0, 0.0, 1.0, 1.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![2.0, 1.0, 1.0, 0.0],
        ])
        .unwrap();
        assert_eq!(nearest_neighbor_order(&matrix), vec![0, 2, 1, 3]);
    }

    #[test]
    fn mismatched_matrix_is_rejected() {
        let locations = stops(3);
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let error = optimize_route(&locations, Some(&matrix), None).expect_err("size mismatch");
        assert!(matches!(
            error,
            Error::MatrixSizeMismatch {
                matrix: 2,
                locations: 3
            }
        ));
    }

    #[test]
    fn cached_geometry_is_used_per_ordered_pair() {
        let locations = stops(3);
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 5.0],
            vec![1.0, 0.0, 1.0],
            vec![5.0, 1.0, 0.0],
        ])
        .unwrap();
        let road = Polyline::from(vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(0.005, 0.001),
            Coordinates::new(0.01, 0.0),
        ]);
        let mut cache = GeometryCache::new();
        cache.insert(0, 1, road.clone());
        // Reverse direction must not be used for the 1 -> 2 leg.
        cache.insert(2, 1, Polyline::default());

        let route = optimize_route(&locations, Some(&matrix), Some(&cache)).unwrap();
        assert_eq!(route.geometries.len(), 2);
        assert_eq!(route.geometries[0], road);
        assert_eq!(
            route.geometries[1],
            Polyline::straight(locations[1].coordinates(), locations[2].coordinates())
        );
        assert_eq!(route.total_distance, 2.0);
    }

    #[test]
    fn builds_great_circle_matrix_when_missing() {
        let locations = vec![
            Location::new("A", 0.0, 0.0),
            Location::new("C", 0.0, 2.0),
            Location::new("B", 0.0, 1.0),
        ];
        let route = optimize_route(&locations, None, None).unwrap();
        let addresses: Vec<&str> = route
            .route
            .iter()
            .map(|stop| stop.location.address.as_str())
            .collect();
        assert_eq!(addresses, vec!["A", "B", "C"]);
        assert!(route.total_distance > 222.0 && route.total_distance < 223.0);
    }

    #[test]
    fn near_antipodal_route_has_finite_total() {
        let locations = vec![
            Location::new("A", 2.5, 0.0),
            Location::new("B", -2.5, 180.0),
        ];
        let route = optimize_route(&locations, None, None).unwrap();

        assert!(route.total_distance.is_finite());
        assert!((route.total_distance - 20015.09).abs() < 0.01);
        let json = serde_json::to_value(&route).unwrap();
        assert!(json["total_distance"].is_number());
    }

    #[test]
    fn strategy_names_fall_back() {
        assert_eq!(RouteStrategy::from_name("two_opt"), RouteStrategy::NearestNeighbor);
        assert_eq!(RouteStrategy::NearestNeighbor.to_string(), "nearest_neighbor");
    }

    #[test]
    fn stop_serializes_flat() {
        let stop = RouteStop {
            location: Location::new("Depot", 1.5, 2.5),
            order: 1,
        };
        let json = serde_json::to_value(&stop).unwrap();
        assert_eq!(json["address"], "Depot");
        assert_eq!(json["lat"], 1.5);
        assert_eq!(json["order"], 1);
    }
}
