//! Pairwise distance matrix and per-leg geometry cache.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{great_circle_distance, Coordinates};
use crate::location::Location;

/// Square matrix of non-negative travel distances in kilometres.
///
/// `get(i, j)` is the distance from location `i` to location `j`; the matrix
/// need not be symmetric. The diagonal is zero by convention.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Build a matrix from explicit rows, validating shape and values.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);

        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != size {
                return Err(Error::MatrixNotSquare {
                    row,
                    expected: size,
                    found: entries.len(),
                });
            }
            for (col, value) in entries.into_iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::InvalidDistance { row, col, value });
                }
                values.push(value);
            }
        }

        Ok(Self { size, values })
    }

    /// Build a matrix by evaluating `distance(i, j)` for every off-diagonal pair.
    ///
    /// Rows are computed in parallel; each entry is written exactly once so
    /// the result does not depend on scheduling.
    pub fn from_fn<F>(size: usize, distance: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        let values = (0..size)
            .into_par_iter()
            .flat_map_iter(|i| {
                let distance = &distance;
                (0..size).map(move |j| if i == j { 0.0 } else { distance(i, j) })
            })
            .collect();

        Self { size, values }
    }

    /// Wrap already-validated row-major values.
    pub(crate) fn from_values(size: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), size * size);
        Self { size, values }
    }

    /// Symmetric great-circle matrix over `locations`.
    pub fn from_locations(locations: &[Location]) -> Self {
        let points: Vec<Coordinates> = locations.iter().map(Location::coordinates).collect();
        Self::from_fn(points.len(), |i, j| great_circle_distance(points[i], points[j]))
    }

    /// Number of locations covered (rows == columns).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        assert!(
            from < self.size && to < self.size,
            "matrix index ({from}, {to}) out of range for size {}",
            self.size
        );
        self.values[from * self.size + to]
    }

    /// Copy the matrix out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks(self.size.max(1))
            .map(<[f64]>::to_vec)
            .collect()
    }
}

impl Serialize for DistanceMatrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DistanceMatrix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        DistanceMatrix::from_rows(rows).map_err(serde::de::Error::custom)
    }
}

/// Ordered sequence of points describing one leg of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Polyline(pub Vec<Coordinates>);

impl Polyline {
    /// Two-point straight segment from `from` to `to`.
    pub fn straight(from: Coordinates, to: Coordinates) -> Self {
        Self(vec![from, to])
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Coordinates>> for Polyline {
    fn from(points: Vec<Coordinates>) -> Self {
        Self(points)
    }
}

/// Geometry for ordered `(origin, destination)` index pairs.
///
/// A missing pair means the leg is drawn as a straight segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryCache {
    legs: HashMap<(usize, usize), Polyline>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: usize, to: usize, polyline: Polyline) {
        self.legs.insert((from, to), polyline);
    }

    pub fn get(&self, from: usize, to: usize) -> Option<&Polyline> {
        self.legs.get(&(from, to))
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}
