#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Great-circle distance math.
//!
//! The nearest-camera search only ever compares distances between points a
//! few kilometres apart, so a plain haversine is plenty. No projection, no
//! spatial index.

/// Degrees-to-radians multiplier (π/180).
const DEG_TO_RAD: f64 = 0.017_453_292_519_943_295;

/// Mean Earth diameter in kilometres.
const EARTH_DIAMETER_KM: f64 = 12_742.0;

/// Computes the great-circle distance in kilometres between two WGS84
/// coordinate pairs using the haversine formula.
///
/// The intermediate haversine term is clamped into `[0, 1]` so floating
/// point drift near zero or antipodal separations can never feed a negative
/// value into the square root.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let hav = 0.5 - ((lat2 - lat1) * DEG_TO_RAD).cos() / 2.0
        + (lat1 * DEG_TO_RAD).cos() * (lat2 * DEG_TO_RAD).cos()
            * (1.0 - ((lon2 - lon1) * DEG_TO_RAD).cos())
            / 2.0;
    EARTH_DIAMETER_KM * hav.clamp(0.0, 1.0).sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_distance() {
        assert!(distance_km(47.6062, -122.3321, 47.6062, -122.3321).abs() < 1e-9);
        assert!(distance_km(0.0, 0.0, 0.0, 0.0).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = distance_km(47.6062, -122.3321, 47.6205, -122.3493);
        let b = distance_km(47.6205, -122.3493, 47.6062, -122.3321);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn downtown_seattle_to_space_needle() {
        // Westlake Park to the Space Needle is roughly 2 km.
        let d = distance_km(47.6101, -122.3375, 47.6205, -122.3493);
        assert!(d > 1.0 && d < 2.5, "unexpected distance: {d}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        // Half of the mean circumference, within a kilometre.
        assert!((d - 20_015.0).abs() < 10.0, "unexpected distance: {d}");
    }
}
