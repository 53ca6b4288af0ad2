#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server exposing Seattle Fire Department incident data.
//!
//! Thin facade over the extraction crates: routes map one-to-one onto the
//! scraper, locator, and camera operations, and the server owns only the
//! JSON encoding, status codes, and the startup-loaded camera registry.
//! Upstream URLs and the bind address come from environment variables so a
//! deployment can point at mirrors of the legacy SFD site.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use fire_map_cameras::CameraRegistry;

/// How long any single upstream fetch may take. The legacy ASP pages are
/// slow but not this slow.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Upstream endpoints, overridable per deployment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Incident detail page (`?ID=<incident_number>` is appended).
    pub incident_url: String,
    /// Real-time 911 call log page.
    pub call_log_url: String,
    /// data.seattle.gov fire-911 JSON feed.
    pub feed_url: String,
    /// Nominatim search endpoint.
    pub geocoder_url: String,
    /// Seattle Travelers camera feed.
    pub camera_feed_url: String,
}

impl ServerConfig {
    /// Reads the configuration from the environment, falling back to the
    /// public Seattle endpoints.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_owned())
        };
        Self {
            incident_url: var(
                "INCIDENT_LOOKUP_URL",
                "https://www2.seattle.gov/fire/IncidentSearch/incidentDetail.asp",
            ),
            call_log_url: var(
                "CALL_LOG_URL",
                "http://www2.seattle.gov/fire/realtime911/getRecsForDatePub.asp",
            ),
            feed_url: var(
                "FIRE_911_FEED_URL",
                "https://data.seattle.gov/resource/fire-911.json",
            ),
            geocoder_url: var(
                "NOMINATIM_URL",
                "https://nominatim.openstreetmap.org/search",
            ),
            camera_feed_url: var(
                "CAMERA_FEED_URL",
                "https://web6.seattle.gov/Travelers/api/Map/Data?zoomId=14&type=2",
            ),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// HTTP client shared by every upstream fetch.
    pub http: reqwest::Client,
    /// Camera registry, loaded once at boot and never refreshed.
    pub cameras: Arc<CameraRegistry>,
    /// Upstream endpoint configuration.
    pub config: ServerConfig,
}

/// Starts the fire map API server.
///
/// Builds the shared HTTP client, loads the camera registry (boot fails if
/// the camera feed is unreachable), and starts the Actix-Web HTTP server.
/// This is a regular async function — the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the HTTP client cannot be constructed or the camera feed
/// cannot be loaded.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();

    let http = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!("fire-map/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client");

    log::info!("Loading camera registry...");
    let cameras = CameraRegistry::load(&http, &config.camera_feed_url)
        .await
        .expect("Failed to load the traffic camera feed");

    let state = web::Data::new(AppState {
        http,
        cameras: Arc::new(cameras),
        config,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .route("/incidents", web::get().to(handlers::incidents_for_date))
            .route("/incidents/active", web::get().to(handlers::active_incidents))
            .route("/cameras", web::get().to(handlers::all_cameras))
            .route(
                "/incident/{incident_number}",
                web::get().to(handlers::incident_detail),
            )
            .route(
                "/incident/{incident_number}/units",
                web::get().to(handlers::incident_units),
            )
            .route(
                "/incident/{incident_number}/location",
                web::get().to(handlers::incident_location),
            )
            .route(
                "/incident/{incident_number}/cameras",
                web::get().to(handlers::incident_cameras),
            )
            .route("/favicon.ico", web::get().to(handlers::favicon))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
