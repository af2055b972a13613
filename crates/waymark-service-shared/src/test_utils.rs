//! Test fixtures for handler testing.
//!
//! Provides an [`AppState`] wired to a fixed address table and great-circle
//! legs, so handler tests never touch the network.

use std::sync::Arc;

use uuid::Uuid;
use waymark_lib::{StaticResolver, StraightLineProvider};

use crate::state::{AppState, RoutingMode};

/// Addresses known to [`test_resolver`].
pub mod fixture_addresses {
    pub const LONDON: &str = "Depot, London";
    pub const OXFORD: &str = "Oxford Warehouse";
    pub const PARIS: &str = "Paris Office";
    pub const EDINBURGH: &str = "Edinburgh Store";
}

/// Resolver that knows the [`fixture_addresses`] and nothing else.
pub fn test_resolver() -> StaticResolver {
    StaticResolver::new()
        .with(fixture_addresses::LONDON, 51.5074, -0.1278)
        .with(fixture_addresses::PARIS, 48.8566, 2.3522)
        .with(fixture_addresses::OXFORD, 51.7520, -1.2577)
        .with(fixture_addresses::EDINBURGH, 55.9533, -3.1883)
}

/// Offline state: fixture resolver plus straight-line legs.
pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(test_resolver()),
        Arc::new(StraightLineProvider),
        RoutingMode::StraightLine,
    )
}

/// Unique request id for tests.
pub fn test_request_id() -> String {
    format!("test-{}", Uuid::now_v7())
}
