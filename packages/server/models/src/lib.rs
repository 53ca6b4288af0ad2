#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the fire map server.
//!
//! Query parameter names deliberately keep the snake_case spelling of the
//! original FireLens API (`use_12_hour_time`, `distance_threshold`) so
//! existing clients keep working; response bodies come straight from
//! [`fire_map_incident_models`] records.

use serde::{Deserialize, Serialize};

/// Query parameters for the incident detail and unit endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DetailQueryParams {
    /// Reformat scraped "HH:MM" times to "hh:MM AM/PM" for display.
    #[serde(default)]
    pub use_12_hour_time: bool,
}

/// Query parameters for the nearby-cameras endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CameraQueryParams {
    /// Maximum distance in kilometres for a camera to count as "nearby".
    /// Defaults to 0.4 km; `0` disables the check and always returns the
    /// nearest pole.
    pub distance_threshold: Option<f64>,
}

impl CameraQueryParams {
    /// Default nearby threshold in kilometres.
    pub const DEFAULT_THRESHOLD_KM: f64 = 0.4;

    /// Resolves the effective threshold: `None` means thresholding is
    /// disabled.
    #[must_use]
    pub fn threshold_km(self) -> Option<f64> {
        match self.distance_threshold {
            Some(t) if t <= 0.0 => None,
            Some(t) => Some(t),
            None => Some(Self::DEFAULT_THRESHOLD_KM),
        }
    }
}

/// Query parameters for the dated call-log endpoint. Date parts default to
/// today's date, individually.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CallLogQueryParams {
    /// Month (1-12).
    pub month: Option<u32>,
    /// Day of month.
    pub day: Option<u32>,
    /// Four-digit year.
    pub year: Option<i32>,
    /// Collapse duplicate rows for the same incident number.
    #[serde(default)]
    pub dedupe: bool,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Structured error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable description of the failure.
    pub error: String,
}

impl ApiError {
    /// Builds an error body.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_threshold_uses_default() {
        let params = CameraQueryParams {
            distance_threshold: None,
        };
        assert_eq!(
            params.threshold_km(),
            Some(CameraQueryParams::DEFAULT_THRESHOLD_KM)
        );
    }

    #[test]
    fn zero_threshold_disables_check() {
        let params = CameraQueryParams {
            distance_threshold: Some(0.0),
        };
        assert_eq!(params.threshold_km(), None);
    }

    #[test]
    fn explicit_threshold_passes_through() {
        let params = CameraQueryParams {
            distance_threshold: Some(1.5),
        };
        assert_eq!(params.threshold_km(), Some(1.5));
    }

    #[test]
    fn detail_params_keep_original_wire_name() {
        let params: DetailQueryParams =
            serde_json::from_str(r#"{"use_12_hour_time": true}"#).unwrap();
        assert!(params.use_12_hour_time);
    }
}
