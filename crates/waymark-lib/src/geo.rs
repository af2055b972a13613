//! Great-circle distance on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and within their valid ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to `other`, in kilometres.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        great_circle_distance(*self, *other)
    }
}

/// Haversine distance between two coordinates, in kilometres.
pub fn great_circle_distance(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal pairs.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_YORK: Coordinates = Coordinates::new(40.7128, -74.0060);
    const LONDON: Coordinates = Coordinates::new(51.5074, -0.1278);

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(great_circle_distance(NEW_YORK, NEW_YORK), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = great_circle_distance(NEW_YORK, LONDON);
        let back = great_circle_distance(LONDON, NEW_YORK);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn new_york_to_london() {
        let distance = NEW_YORK.distance_to(&LONDON);
        assert!(
            (distance - 5570.0).abs() <= 55.7,
            "expected ~5570 km, got {distance}"
        );
    }

    #[test]
    fn antipodes_are_half_the_circumference() {
        let distance = great_circle_distance(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn near_antipodal_pairs_stay_finite() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        for tenth in 0..=900 {
            let lat = f64::from(tenth) / 10.0;
            let distance =
                great_circle_distance(Coordinates::new(lat, 0.0), Coordinates::new(-lat, 180.0));
            assert!(distance.is_finite(), "lat {lat} gave {distance}");
            assert!((distance - half_circumference).abs() < 1e-6, "lat {lat} gave {distance}");
        }
    }

    #[test]
    fn validity_checks_ranges() {
        assert!(NEW_YORK.is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }
}
