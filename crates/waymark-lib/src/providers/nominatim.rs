use std::thread;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{LocationResolver, ProviderConfig, REQUEST_TIMEOUT};
use crate::error::{Error, Result};
use crate::location::{Location, Resolution, ResolutionFailure};

const NOT_FOUND_REASON: &str = "Address not found";

/// Geocoder backed by an OpenStreetMap Nominatim instance.
///
/// Each lookup waits for the configured delay first; the public instance
/// allows one request per second.
#[derive(Debug, Clone)]
pub struct NominatimResolver {
    client: Client,
    base_url: String,
    delay: std::time::Duration,
}

impl NominatimResolver {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            delay: config.geocode_delay,
        })
    }

    fn lookup(&self, address: &str) -> Result<Resolution> {
        let url = format!("{}/search", self.base_url);
        let body = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .text()?;

        parse_nominatim_response(address, &body)
    }
}

impl LocationResolver for NominatimResolver {
    fn resolve(&self, address: &str) -> Resolution {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        match self.lookup(address) {
            Ok(resolution) => {
                debug!(address, resolved = resolution.is_resolved(), "geocoded address");
                resolution
            }
            Err(error) => {
                warn!(address, error = %error, "geocoding request failed");
                Resolution::Failed(ResolutionFailure::new(address, error.to_string()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Interpret a Nominatim `/search?format=json` body for `address`.
///
/// An empty result list is an ordinary failure ("Address not found"). A
/// malformed body or unparsable coordinates is an error.
pub fn parse_nominatim_response(address: &str, body: &str) -> Result<Resolution> {
    let places: Vec<Place> = serde_json::from_str(body)?;
    let Some(place) = places.into_iter().next() else {
        return Ok(Resolution::Failed(ResolutionFailure::new(
            address,
            NOT_FOUND_REASON,
        )));
    };

    let lat = parse_degrees(&place.lat, "lat")?;
    let lng = parse_degrees(&place.lon, "lon")?;
    Ok(Resolution::Resolved(Location::new(address, lat, lng)))
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::Geocoding {
            message: format!("invalid {field} value {raw:?}"),
        })
}
