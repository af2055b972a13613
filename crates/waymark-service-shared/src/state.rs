//! Application state shared by axum handlers.
//!
//! Holds the geocoder and the leg provider behind trait objects so handlers
//! can move them onto the blocking pool.

use std::sync::Arc;

use waymark_lib::{
    Error as LibError, LocationResolver, NominatimResolver, OsrmProvider, PathGeometryProvider,
    ProviderConfig, StraightLineProvider,
};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// An HTTP-backed provider could not be constructed.
    ProviderInit(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProviderInit(e) => write!(f, "failed to initialise provider: {e}"),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ProviderInit(e) => Some(e),
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::ProviderInit(err)
    }
}

/// Where leg distances come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMode {
    /// Road distances and geometry from the routing service.
    Road,
    /// Great-circle distances with straight segments.
    StraightLine,
}

impl RoutingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingMode::Road => "road",
            RoutingMode::StraightLine => "straight_line",
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` inside); share it via axum's `State` extractor.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use waymark_lib::{StaticResolver, StraightLineProvider};
/// use waymark_service_shared::{AppState, RoutingMode};
///
/// let resolver = StaticResolver::new().with("Depot", 51.5, -0.12);
/// let state = AppState::new(Arc::new(resolver), Arc::new(StraightLineProvider), RoutingMode::StraightLine);
/// assert_eq!(state.routing_mode(), RoutingMode::StraightLine);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    resolver: Arc<dyn LocationResolver>,
    provider: Arc<dyn PathGeometryProvider>,
    routing_mode: RoutingMode,
}

impl AppState {
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        provider: Arc<dyn PathGeometryProvider>,
        routing_mode: RoutingMode,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                resolver,
                provider,
                routing_mode,
            }),
        }
    }

    /// Build the production state from the environment.
    ///
    /// Geocoding always goes through Nominatim. Legs come from OSRM unless
    /// `WAYMARK_OFFLINE=1`, in which case great-circle distances are used.
    ///
    /// Must not be called from inside an async runtime: the HTTP clients
    /// are blocking.
    pub fn from_env() -> Result<Self, AppStateError> {
        let config = ProviderConfig::from_env();
        let offline = std::env::var("WAYMARK_OFFLINE")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        tracing::info!(
            nominatim = %config.nominatim_url,
            osrm = %config.osrm_url,
            offline,
            "configuring providers"
        );

        let resolver: Arc<dyn LocationResolver> = Arc::new(NominatimResolver::new(&config)?);
        let state = if offline {
            Self::new(resolver, Arc::new(StraightLineProvider), RoutingMode::StraightLine)
        } else {
            Self::new(resolver, Arc::new(OsrmProvider::new(&config)?), RoutingMode::Road)
        };
        Ok(state)
    }

    /// Geocoder handle, cloneable into blocking tasks.
    pub fn resolver(&self) -> Arc<dyn LocationResolver> {
        Arc::clone(&self.inner.resolver)
    }

    /// Leg provider handle, cloneable into blocking tasks.
    pub fn provider(&self) -> Arc<dyn PathGeometryProvider> {
        Arc::clone(&self.inner.provider)
    }

    pub fn routing_mode(&self) -> RoutingMode {
        self.inner.routing_mode
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("routing_mode", &self.inner.routing_mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_lib::{Resolution, StaticResolver};

    #[test]
    fn clones_share_providers() {
        let resolver = StaticResolver::new().with("Depot", 1.0, 2.0);
        let state = AppState::new(
            Arc::new(resolver),
            Arc::new(StraightLineProvider),
            RoutingMode::StraightLine,
        );
        let copy = state.clone();

        assert!(Arc::ptr_eq(&state.resolver(), &copy.resolver()));
        assert!(matches!(state.resolver().resolve("depot"), Resolution::Resolved(_)));
        assert_eq!(copy.routing_mode().as_str(), "straight_line");
    }

    #[test]
    fn error_exposes_source() {
        let error = AppStateError::from(LibError::EmptyGrid);
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().starts_with("failed to initialise provider"));
    }
}
