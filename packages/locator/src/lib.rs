#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident location resolution.
//!
//! Recent incidents appear in the data.seattle.gov fire-911 JSON feed with
//! official coordinates; those are always preferred. Older incidents fall
//! off the feed, so the dispatch address is geocoded through Nominatim
//! instead. The [`fire_map_incident_models::Location`] `source` field
//! records which path produced the coordinates.

use fire_map_geocoder::{GeocodeError, GeocodedAddress, nominatim};
use fire_map_incident_models::Location;
use serde::Deserialize;

/// Suffix appended to the scraped dispatch address before geocoding. The
/// incident pages never include the city.
const GEOCODE_SUFFIX: &str = " Seattle, WA";

/// Upstream endpoints used during resolution.
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// The fire-911 JSON feed URL.
    pub feed_url: String,
    /// The Nominatim search endpoint URL.
    pub geocoder_url: String,
}

/// Errors from location resolution.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    /// Fetching the fire-911 feed failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The geocoding fallback failed outright (as opposed to returning no
    /// match).
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// Neither the feed nor the geocoder produced coordinates.
    #[error("Could not resolve a location for incident {incident_number}")]
    Unresolved {
        /// The incident that could not be located.
        incident_number: String,
    },
}

/// One record of the fire-911 feed. Coordinates are string-encoded numbers
/// in the upstream JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedRecord {
    /// SFD incident number.
    #[serde(default)]
    pub incident_number: Option<String>,
    #[serde(default)]
    latitude: Option<String>,
    #[serde(default)]
    longitude: Option<String>,
}

/// Resolves coordinates for an incident.
///
/// Scans the fire-911 feed in its native order and takes the first record
/// whose incident number matches exactly. Only when the feed has no match
/// is the dispatch address geocoded (with [`GEOCODE_SUFFIX`] appended).
///
/// # Errors
///
/// Returns [`LocateError::Http`] or [`LocateError::Geocode`] if an
/// upstream request fails, and [`LocateError::Unresolved`] when both steps
/// come up empty. Callers that tolerate unknown locations should map
/// `Unresolved` to a [`Location::default`] partial result.
pub async fn resolve(
    client: &reqwest::Client,
    config: &LocatorConfig,
    incident_number: &str,
    address: Option<&str>,
) -> Result<Location, LocateError> {
    let records = fetch_feed(client, &config.feed_url).await?;

    if let Some(location) = choose_source(find_in_feed(&records, incident_number), None) {
        log::debug!("Resolved {incident_number} from the fire-911 feed");
        return Ok(location);
    }

    if let Some(address) = address {
        let query = format!("{address}{GEOCODE_SUFFIX}");
        let geocoded = nominatim::geocode_freeform(client, &config.geocoder_url, &query).await?;
        if let Some(location) = choose_source(None, geocoded.as_ref()) {
            log::debug!("Resolved {incident_number} by geocoding {query:?}");
            return Ok(location);
        }
    }

    Err(LocateError::Unresolved {
        incident_number: incident_number.to_owned(),
    })
}

/// The source-preference decision: official feed coordinates always win,
/// and the winning side determines the provenance tag. `None` when neither
/// source produced coordinates.
#[must_use]
pub fn choose_source(
    feed: Option<(f64, f64)>,
    geocoded: Option<&GeocodedAddress>,
) -> Option<Location> {
    if let Some((latitude, longitude)) = feed {
        return Some(Location::resolved(
            latitude,
            longitude,
            Location::SOURCE_FEED,
        ));
    }
    geocoded.map(|result| {
        Location::resolved(
            result.latitude,
            result.longitude,
            Location::SOURCE_GEOCODER,
        )
    })
}

async fn fetch_feed(
    client: &reqwest::Client,
    feed_url: &str,
) -> Result<Vec<FeedRecord>, LocateError> {
    let response = client.get(feed_url).send().await?.error_for_status()?;
    Ok(response.json().await?)
}

/// Scans feed records for an exact incident-number match. First match wins;
/// records with missing or unparseable coordinates are skipped.
#[must_use]
pub fn find_in_feed(records: &[FeedRecord], incident_number: &str) -> Option<(f64, f64)> {
    records
        .iter()
        .filter(|record| record.incident_number.as_deref() == Some(incident_number))
        .find_map(|record| {
            let latitude = record.latitude.as_deref()?.parse::<f64>().ok()?;
            let longitude = record.longitude.as_deref()?.parse::<f64>().ok()?;
            Some((latitude, longitude))
        })
}
