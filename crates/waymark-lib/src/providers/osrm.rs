use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use super::{Leg, PathGeometryProvider, ProviderConfig, REQUEST_TIMEOUT};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::location::Location;
use crate::matrix::Polyline;

/// Road routing backed by an OSRM `route` service using the driving profile.
#[derive(Debug, Clone)]
pub struct OsrmProvider {
    client: Client,
    base_url: String,
    delay: Duration,
}

impl OsrmProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: config.osrm_url.trim_end_matches('/').to_string(),
            delay: config.routing_delay,
        })
    }

    fn route_url(&self, from: Coordinates, to: Coordinates) -> String {
        // OSRM takes longitude first.
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, from.lng, from.lat, to.lng, to.lat
        )
    }
}

impl PathGeometryProvider for OsrmProvider {
    fn route(&self, from: &Location, to: &Location) -> Result<Leg> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let url = self.route_url(from.coordinates(), to.coordinates());
        let body = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("steps", "false"),
            ])
            .send()?
            .error_for_status()?
            .text()?;

        let leg = parse_osrm_response(&body)?;
        debug!(
            from = %from.address,
            to = %to.address,
            distance_km = leg.distance_km,
            points = leg.polyline.len(),
            "road leg fetched"
        );
        Ok(leg)
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Metres.
    distance: f64,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON `[lng, lat]` pairs.
    coordinates: Vec<[f64; 2]>,
}

/// Interpret an OSRM `route` response body as a [`Leg`].
///
/// Uses the first route. Distance is converted from metres to kilometres and
/// GeoJSON `[lng, lat]` positions are swapped into [`Coordinates`].
pub fn parse_osrm_response(body: &str) -> Result<Leg> {
    let response: RouteResponse = serde_json::from_str(body)?;
    if response.code != "Ok" {
        return Err(Error::RoutingService {
            message: match response.message {
                Some(message) => format!("{}: {}", response.code, message),
                None => response.code,
            },
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| Error::RoutingService {
            message: "response contained no routes".to_string(),
        })?;

    let polyline = route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lng, lat]| Coordinates::new(lat, lng))
        .collect::<Vec<_>>();

    Ok(Leg {
        distance_km: route.distance / 1000.0,
        polyline: Polyline::from(polyline),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_distance_and_swaps_coordinates() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 12345.6,
                "duration": 900.0,
                "geometry": {"type": "LineString", "coordinates": [[-74.0, 40.7], [-73.9, 40.8]]}
            }],
            "waypoints": []
        }"#;
        let leg = parse_osrm_response(body).unwrap();
        assert!((leg.distance_km - 12.3456).abs() < 1e-9);
        assert_eq!(
            leg.polyline.points(),
            &[Coordinates::new(40.7, -74.0), Coordinates::new(40.8, -73.9)]
        );
    }

    #[test]
    fn non_ok_code_is_an_error() {
        let body = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;
        let error = parse_osrm_response(body).expect_err("no route");
        assert_eq!(
            error.to_string(),
            "routing service error: NoRoute: Impossible route between points"
        );
    }

    #[test]
    fn missing_routes_is_an_error() {
        let error = parse_osrm_response(r#"{"code": "Ok", "routes": []}"#).expect_err("empty");
        assert!(matches!(error, Error::RoutingService { .. }));
    }

    #[test]
    fn url_puts_longitude_first() {
        let provider = OsrmProvider::new(&ProviderConfig {
            osrm_url: "http://osrm.local/".to_string(),
            ..ProviderConfig::default()
        })
        .unwrap();
        let url = provider.route_url(Coordinates::new(40.7, -74.0), Coordinates::new(51.5, -0.1));
        assert_eq!(url, "http://osrm.local/route/v1/driving/-74,40.7;-0.1,51.5");
    }
}
