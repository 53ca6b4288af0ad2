#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic camera registry and nearest-camera search.
//!
//! The Seattle Travelers map feed lists camera poles, each carrying one or
//! more camera views at a single `PointCoordinate`. The registry is fetched
//! once at process startup (load-or-fail) and then held read-only for the
//! life of the process; there are only a few hundred poles city-wide, so
//! nearest searches are a plain linear scan.

use fire_map_incident_models::{Camera, CameraOperator, CameraPole};
use fire_map_spatial::distance_km;
use serde::Deserialize;

/// Errors from loading the camera feed.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// The feed fetch failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed body was not the expected JSON shape.
    #[error("Feed parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "Features", default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `[latitude, longitude]` of the pole.
    #[serde(rename = "PointCoordinate")]
    point_coordinate: Option<[f64; 2]>,
    #[serde(rename = "Cameras", default)]
    cameras: Vec<FeedCamera>,
}

/// One camera view as listed by the Travelers feed. `Id` has flipped
/// between numeric and string encodings across feed revisions, so it is
/// taken as a raw JSON value.
#[derive(Debug, Deserialize)]
struct FeedCamera {
    #[serde(rename = "Id", default)]
    id: Option<serde_json::Value>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "ImageUrl", default)]
    image_url: Option<String>,
    #[serde(rename = "Type", default)]
    camera_type: Option<String>,
}

impl FeedCamera {
    fn into_camera(self, pole: Option<[f64; 2]>) -> Camera {
        let id = self.id.map(|value| match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        // Unrecognized `Type` values degrade to an unknown operator rather
        // than dropping the camera.
        let operator = self
            .camera_type
            .as_deref()
            .and_then(|t| t.parse::<CameraOperator>().ok());

        Camera {
            id,
            description: self.description,
            image_url: self.image_url,
            operator,
            latitude: pole.map(|p| p[0]),
            longitude: pole.map(|p| p[1]),
        }
    }
}

/// Read-only snapshot of the city's traffic camera poles.
///
/// Loaded once during server startup and shared behind an `Arc` across all
/// requests. Never refreshed mid-process.
#[derive(Debug, Clone)]
pub struct CameraRegistry {
    poles: Vec<CameraPole>,
}

impl CameraRegistry {
    /// Fetches the Travelers feed and builds the registry.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError`] if the fetch fails or the body is not the
    /// expected feed shape. Callers should treat this as fatal at boot.
    pub async fn load(client: &reqwest::Client, feed_url: &str) -> Result<Self, CameraError> {
        let response = client.get(feed_url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let registry = Self::from_feed_json(&body)?;
        log::info!("Loaded {} camera poles", registry.poles.len());
        Ok(registry)
    }

    /// Builds the registry from a raw feed body.
    ///
    /// Features without a `PointCoordinate` cannot be searched and are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::Parse`] if the body is not valid feed JSON.
    pub fn from_feed_json(body: &str) -> Result<Self, CameraError> {
        let feed: Feed = serde_json::from_str(body)?;

        let poles = feed
            .features
            .into_iter()
            .filter_map(|feature| {
                let point = feature.point_coordinate?;
                let cameras: Vec<Camera> = feature
                    .cameras
                    .into_iter()
                    .map(|camera| camera.into_camera(Some(point)))
                    .collect();
                Some(CameraPole {
                    latitude: point[0],
                    longitude: point[1],
                    cameras,
                })
            })
            .collect();

        Ok(Self { poles })
    }

    /// Returns the pole closest to the query point, or `None` when the
    /// closest pole is farther than `threshold_km` (or the registry is
    /// empty).
    ///
    /// The scan tracks a strict minimum, so the first of two equidistant
    /// poles wins. `threshold_km = None` disables the distance check and
    /// always returns the nearest pole if one exists.
    #[must_use]
    pub fn nearest(
        &self,
        latitude: f64,
        longitude: f64,
        threshold_km: Option<f64>,
    ) -> Option<&CameraPole> {
        let mut closest: Option<(f64, &CameraPole)> = None;

        for pole in &self.poles {
            let dist = distance_km(latitude, longitude, pole.latitude, pole.longitude);
            if closest.is_none_or(|(best, _)| dist < best) {
                closest = Some((dist, pole));
            }
        }

        let (dist, pole) = closest?;
        if threshold_km.is_none_or(|threshold| dist < threshold) {
            Some(pole)
        } else {
            log::debug!("Nearest pole is {dist:.2} km away, beyond threshold");
            None
        }
    }

    /// All poles, in feed order.
    #[must_use]
    pub fn poles(&self) -> &[CameraPole] {
        &self.poles
    }

    /// Number of poles in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poles.len()
    }

    /// Whether the registry holds no poles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poles.is_empty()
    }
}
