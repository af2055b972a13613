//! Locations and the outcome of resolving an address.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Coordinates;

/// A delivery stop whose address has been resolved to coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            address: address.into(),
            lat,
            lng,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Why an address could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionFailure {
    pub address: String,
    #[serde(rename = "error")]
    pub reason: String,
}

impl ResolutionFailure {
    pub fn new(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            reason: reason.into(),
        }
    }
}

/// Result of resolving a single address.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(Location),
    Failed(ResolutionFailure),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn address(&self) -> &str {
        match self {
            Resolution::Resolved(location) => &location.address,
            Resolution::Failed(failure) => &failure.address,
        }
    }
}

/// Keep every resolved location, or refuse the whole batch.
///
/// Partial routes are never built: if any address failed, the error lists
/// every failure in input order.
pub fn collect_resolved(resolutions: Vec<Resolution>) -> Result<Vec<Location>> {
    let mut resolved = Vec::with_capacity(resolutions.len());
    let mut failures = Vec::new();

    for resolution in resolutions {
        match resolution {
            Resolution::Resolved(location) => resolved.push(location),
            Resolution::Failed(failure) => failures.push(failure),
        }
    }

    if failures.is_empty() {
        Ok(resolved)
    } else {
        Err(Error::UnresolvedLocations { failures })
    }
}
