#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate type and great-circle distance.
//!
//! Distances are computed with the haversine formula on a spherical Earth
//! of radius [`EARTH_RADIUS_KM`]. This is accurate to well under a percent
//! at the scale of a single country, which is all the hub lookup needs.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for all distance calculations, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude, `-90.0..=90.0`.
    pub latitude: f64,
    /// Longitude, `-180.0..=180.0`.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate. No range check is performed; see
    /// [`Coordinate::is_valid`].
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and within their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in kilometers.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance_km(*self, *other)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between `a` and `b` in kilometers (haversine).
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (lat1.cos() * lat2.cos())
        .mul_add((d_lon / 2.0).sin().powi(2), (d_lat / 2.0).sin().powi(2));
    // Rounding can push `h` a hair above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const KYIV: Coordinate = Coordinate::new(50.4501, 30.5234);
    const LVIV: Coordinate = Coordinate::new(49.8397, 24.0297);

    #[test]
    fn distance_to_self_is_zero() {
        assert!(distance_km(KYIV, KYIV).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_km(KYIV, LVIV);
        let ba = distance_km(LVIV, KYIV);
        assert!((ab - ba).abs() < 1e-9, "{ab} != {ba}");
    }

    #[test]
    fn kyiv_to_lviv_is_about_470_km() {
        let d = KYIV.distance_to(&LVIV);
        assert!((465.0..475.0).contains(&d), "unexpected distance {d}");
    }

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        let expected = EARTH_RADIUS_KM * 1.0_f64.to_radians();
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn validates_ranges() {
        assert!(KYIV.is_valid());
        assert!(Coordinate::new(90.0, -180.0).is_valid());
        assert!(!Coordinate::new(90.1, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }
}
