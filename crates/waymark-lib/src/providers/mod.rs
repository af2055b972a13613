//! Boundary with the external data sources.
//!
//! The core never performs I/O itself. Addresses are resolved through a
//! [`LocationResolver`] and road distances come from a
//! [`PathGeometryProvider`]; both run before sequencing starts.
//!
//! Implementations:
//! - [`NominatimResolver`] - OpenStreetMap Nominatim geocoding over HTTP
//! - [`StaticResolver`] - fixed address table (offline use and tests)
//! - [`OsrmProvider`] - OSRM road routing over HTTP
//! - [`StraightLineProvider`] - great-circle distance with straight segments

mod nominatim;
mod osrm;

pub use nominatim::{parse_nominatim_response, NominatimResolver};
pub use osrm::{parse_osrm_response, OsrmProvider};

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;
use crate::geo::{great_circle_distance, Coordinates};
use crate::location::{Location, Resolution, ResolutionFailure};
use crate::matrix::{DistanceMatrix, GeometryCache, Polyline};

const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";
const DEFAULT_USER_AGENT: &str = "waymark-route-optimizer";
const DEFAULT_GEOCODE_DELAY_MS: u64 = 1000;
const DEFAULT_ROUTING_DELAY_MS: u64 = 500;

/// Per-request timeout for both external services.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves a free-form address to coordinates.
pub trait LocationResolver: Send + Sync {
    /// Resolve `address`. Failures are reported in the returned value, never
    /// as a panic or error.
    fn resolve(&self, address: &str) -> Resolution;
}

/// Travel distance and geometry for one directed leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub distance_km: f64,
    pub polyline: Polyline,
}

/// Supplies road distance and geometry between two locations.
pub trait PathGeometryProvider: Send + Sync {
    fn route(&self, from: &Location, to: &Location) -> Result<Leg>;
}

/// Resolve every address in input order.
pub fn resolve_all<R>(resolver: &R, addresses: &[String]) -> Vec<Resolution>
where
    R: LocationResolver + ?Sized,
{
    addresses
        .iter()
        .map(|address| {
            let resolution = resolver.resolve(address);
            debug!(
                address = resolution.address(),
                resolved = resolution.is_resolved(),
                "address looked up"
            );
            resolution
        })
        .collect()
}

/// Query `provider` for every ordered pair and assemble the distance matrix
/// and geometry cache.
///
/// A failed or unusable leg falls back to great-circle distance and a
/// straight segment; the failure is logged and never returned.
pub fn build_route_matrix<P>(provider: &P, locations: &[Location]) -> (DistanceMatrix, GeometryCache)
where
    P: PathGeometryProvider + ?Sized,
{
    let n = locations.len();
    let mut values = vec![0.0; n * n];
    let mut cache = GeometryCache::new();
    let mut fallbacks = 0usize;

    for (i, from) in locations.iter().enumerate() {
        for (j, to) in locations.iter().enumerate() {
            if i == j {
                continue;
            }

            let leg = match provider.route(from, to) {
                Ok(leg) if leg.distance_km.is_finite() && leg.distance_km >= 0.0 => leg,
                Ok(leg) => {
                    warn!(
                        from = %from.address,
                        to = %to.address,
                        distance_km = leg.distance_km,
                        "routing service returned an invalid distance, using straight line"
                    );
                    fallbacks += 1;
                    straight_leg(from, to)
                }
                Err(error) => {
                    warn!(
                        from = %from.address,
                        to = %to.address,
                        error = %error,
                        "routing lookup failed, using straight line"
                    );
                    fallbacks += 1;
                    straight_leg(from, to)
                }
            };

            values[i * n + j] = leg.distance_km;
            cache.insert(i, j, leg.polyline);
        }
    }

    debug!(locations = n, fallbacks, "route matrix assembled");
    (DistanceMatrix::from_values(n, values), cache)
}

fn straight_leg(from: &Location, to: &Location) -> Leg {
    let (a, b) = (from.coordinates(), to.coordinates());
    Leg {
        distance_km: great_circle_distance(a, b),
        polyline: Polyline::straight(a, b),
    }
}

/// Great-circle legs with straight-segment geometry. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineProvider;

impl PathGeometryProvider for StraightLineProvider {
    fn route(&self, from: &Location, to: &Location) -> Result<Leg> {
        Ok(straight_leg(from, to))
    }
}

/// Resolver backed by a fixed, case-insensitive address table.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, Coordinates>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an address with its coordinates.
    pub fn with(mut self, address: impl AsRef<str>, lat: f64, lng: f64) -> Self {
        self.entries
            .insert(normalize_address(address.as_ref()), Coordinates::new(lat, lng));
        self
    }
}

impl LocationResolver for StaticResolver {
    fn resolve(&self, address: &str) -> Resolution {
        match self.entries.get(&normalize_address(address)) {
            Some(point) => Resolution::Resolved(Location::new(address, point.lat, point.lng)),
            None => Resolution::Failed(ResolutionFailure::new(address, "Address not found")),
        }
    }
}

fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Endpoints and politeness settings for the HTTP-backed providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub nominatim_url: String,
    pub osrm_url: String,
    pub user_agent: String,
    /// Pause before every geocoding request.
    pub geocode_delay: Duration,
    /// Pause before every routing request.
    pub routing_delay: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geocode_delay: Duration::from_millis(DEFAULT_GEOCODE_DELAY_MS),
            routing_delay: Duration::from_millis(DEFAULT_ROUTING_DELAY_MS),
        }
    }
}

impl ProviderConfig {
    /// Create configuration from environment variables.
    ///
    /// - `WAYMARK_NOMINATIM_URL`: geocoder base URL
    /// - `WAYMARK_OSRM_URL`: routing service base URL
    /// - `WAYMARK_USER_AGENT`: user agent sent to both services
    /// - `WAYMARK_GEOCODE_DELAY_MS`: delay before each geocoding request (default: 1000)
    /// - `WAYMARK_ROUTING_DELAY_MS`: delay before each routing request (default: 500)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            nominatim_url: std::env::var("WAYMARK_NOMINATIM_URL").unwrap_or(defaults.nominatim_url),
            osrm_url: std::env::var("WAYMARK_OSRM_URL").unwrap_or(defaults.osrm_url),
            user_agent: std::env::var("WAYMARK_USER_AGENT").unwrap_or(defaults.user_agent),
            geocode_delay: env_millis("WAYMARK_GEOCODE_DELAY_MS").unwrap_or(defaults.geocode_delay),
            routing_delay: env_millis("WAYMARK_ROUTING_DELAY_MS").unwrap_or(defaults.routing_delay),
        }
    }

    /// Drop both politeness delays (for local services and tests).
    pub fn without_delays(mut self) -> Self {
        self.geocode_delay = Duration::ZERO;
        self.routing_delay = Duration::ZERO;
        self
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Provider that fails for one specific directed pair.
    struct FlakyProvider {
        broken: (String, String),
    }

    impl PathGeometryProvider for FlakyProvider {
        fn route(&self, from: &Location, to: &Location) -> Result<Leg> {
            if (from.address.as_str(), to.address.as_str())
                == (self.broken.0.as_str(), self.broken.1.as_str())
            {
                return Err(Error::RoutingService {
                    message: "no route".to_string(),
                });
            }
            Ok(Leg {
                distance_km: 42.0,
                polyline: Polyline::from(vec![
                    from.coordinates(),
                    Coordinates::new(9.0, 9.0),
                    to.coordinates(),
                ]),
            })
        }
    }

    fn locations() -> Vec<Location> {
        vec![
            Location::new("A", 0.0, 0.0),
            Location::new("B", 0.0, 1.0),
            Location::new("C", 1.0, 1.0),
        ]
    }

    #[test]
    fn failed_pair_falls_back_to_great_circle() {
        let provider = FlakyProvider {
            broken: ("A".to_string(), "B".to_string()),
        };
        let locations = locations();
        let (matrix, cache) = build_route_matrix(&provider, &locations);

        assert_eq!(matrix.len(), 3);
        assert_eq!(cache.len(), 6);
        assert_eq!(matrix.get(1, 0), 42.0);
        assert_eq!(matrix.get(0, 0), 0.0);

        let expected = great_circle_distance(locations[0].coordinates(), locations[1].coordinates());
        assert!((matrix.get(0, 1) - expected).abs() < 1e-9);
        assert_eq!(cache.get(0, 1).map(Polyline::len), Some(2));
        assert_eq!(cache.get(1, 0).map(Polyline::len), Some(3));
    }

    #[test]
    fn straight_line_provider_matches_great_circle() {
        let locations = locations();
        let (matrix, _) = build_route_matrix(&StraightLineProvider, &locations);
        assert_eq!(matrix, DistanceMatrix::from_locations(&locations));
    }

    #[test]
    fn near_antipodal_fallback_legs_are_finite() {
        let provider = FlakyProvider {
            broken: ("North".to_string(), "South".to_string()),
        };
        let locations = vec![
            Location::new("North", 2.5, 0.0),
            Location::new("South", -2.5, 180.0),
        ];

        let (straight, _) = build_route_matrix(&StraightLineProvider, &locations);
        let (fallback, _) = build_route_matrix(&provider, &locations);

        for matrix in [&straight, &fallback] {
            for (i, j) in [(0, 1), (1, 0)] {
                assert!(matrix.get(i, j).is_finite(), "({i}, {j}) = {}", matrix.get(i, j));
            }
        }
        assert!((fallback.get(0, 1) - std::f64::consts::PI * crate::geo::EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn static_resolver_is_case_insensitive() {
        let resolver = StaticResolver::new().with("Depot", 1.0, 2.0);
        let resolutions = resolve_all(&resolver, &["  depot ".to_string(), "Elsewhere".to_string()]);

        assert!(resolutions[0].is_resolved());
        assert_eq!(
            resolutions[1],
            Resolution::Failed(ResolutionFailure::new("Elsewhere", "Address not found"))
        );
    }

    #[test]
    fn config_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.geocode_delay, Duration::from_secs(1));
        assert_eq!(config.routing_delay, Duration::from_millis(500));
        let quiet = config.without_delays();
        assert_eq!(quiet.geocode_delay, Duration::ZERO);
    }
}
