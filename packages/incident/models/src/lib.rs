#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Domain records produced by the fire-map extraction pipeline.
//!
//! Every record is an immutable per-request snapshot assembled from freshly
//! fetched upstream HTML or JSON. Fields are optional across the board
//! because the SFD incident pages frequently leave cells blank and partial
//! extraction is a valid outcome.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single dispatched fire/emergency response event.
///
/// Produced by both the detail-page extractor (all metadata fields, no
/// `active` flag) and the daily call-log extractor (summary fields plus
/// `active`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// SFD incident number (e.g., "F000000000").
    pub incident_number: Option<String>,
    /// Incident date as displayed by the source page.
    pub date: Option<String>,
    /// Incident time, "HH:MM" or "hh:MM AM/PM" depending on caller options.
    pub time: Option<String>,
    /// Dispatch address.
    pub address: Option<String>,
    /// Incident type (e.g., "Aid Response").
    pub incident_type: Option<String>,
    /// Alarm level.
    pub alarm_level: Option<String>,
    /// Whether the call is still active. Only populated by the call-log
    /// extractor; `None` for detail-page extractions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// An apparatus/crew dispatched to an incident, with its response timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Unit designator with the primary marker (`*`) stripped.
    pub name: Option<String>,
    /// Whether this was the primary (lead-responding) unit.
    pub primary: bool,
    /// Dispatch time, `None` if the stage was never reached.
    pub dispatched: Option<String>,
    /// Arrival time.
    pub arrived: Option<String>,
    /// Back-in-service time.
    pub in_service: Option<String>,
}

/// Resolved geographic coordinates for an incident.
///
/// `source` is set if and only if the coordinates are set, and records which
/// provider produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Coordinate provenance: [`Location::SOURCE_FEED`] or
    /// [`Location::SOURCE_GEOCODER`].
    pub source: Option<String>,
}

impl Location {
    /// Provenance tag for coordinates taken from the official fire-911 feed.
    pub const SOURCE_FEED: &'static str = "data.seattle.gov";
    /// Provenance tag for coordinates obtained by geocoding the address.
    pub const SOURCE_GEOCODER: &'static str = "Nominatim (fallback)";

    /// Builds a resolved location with the given provenance tag.
    #[must_use]
    pub fn resolved(latitude: f64, longitude: f64, source: &str) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            source: Some(source.to_owned()),
        }
    }

    /// Whether coordinates were resolved.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Which agency operates a traffic camera. The operator determines how the
/// `image_url` is consumed: SDOT cameras expose HLS video streams, WSDOT
/// cameras expose periodically refreshed still images.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CameraOperator {
    /// Seattle Department of Transportation (streaming).
    Sdot,
    /// Washington State Department of Transportation (still images).
    Wsdot,
}

impl CameraOperator {
    /// Whether this operator's cameras are live video streams rather than
    /// still images.
    #[must_use]
    pub const fn is_stream(self) -> bool {
        matches!(self, Self::Sdot)
    }
}

/// A single traffic camera view, as listed by the Seattle Travelers feed.
///
/// Taken wholesale from the upstream listing; not independently validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    /// Feed-assigned camera ID.
    pub id: Option<String>,
    /// Human-readable location label (e.g., "4 Ave S & S Jackson St").
    pub description: Option<String>,
    /// Image or stream URL fragment, interpreted per [`CameraOperator`].
    pub image_url: Option<String>,
    /// Operating agency, when the feed's `Type` value is recognized.
    pub operator: Option<CameraOperator>,
    /// Latitude of the camera itself, when listed separately from the pole.
    pub latitude: Option<f64>,
    /// Longitude of the camera itself.
    pub longitude: Option<f64>,
}

/// A physical pole carrying one or more camera views at a single point.
///
/// The Travelers feed groups views per pole; nearest-camera searches return
/// the closest pole's whole group rather than a single view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPole {
    /// Pole latitude.
    pub latitude: f64,
    /// Pole longitude.
    pub longitude: f64,
    /// Camera views mounted at this point.
    pub cameras: Vec<Camera>,
}
