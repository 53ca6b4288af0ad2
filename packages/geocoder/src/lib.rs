#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Nominatim / OpenStreetMap geocoding client.
//!
//! Converts a free-text address into latitude/longitude coordinates. Used
//! as the fallback when an incident is too old to still appear in the
//! fire-911 feed. Nominatim's public instance has strict rate limits
//! (**1 request per second** maximum); the incident site is far slower than
//! that in practice, so no client-side throttling is applied here.

pub mod nominatim;

use thiserror::Error;

/// A geocoding result with coordinates and the matched display name.
#[derive(Debug, Clone)]
pub struct GeocodedAddress {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// The canonical address Nominatim matched against.
    pub matched_address: Option<String>,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}
