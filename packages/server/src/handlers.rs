//! HTTP handler functions for the fire map API.
//!
//! Each handler performs the upstream fetches for one route and owns the
//! mapping from core errors to status codes: upstream fetch/layout problems
//! become 502s, an unresolvable location degrades to a partial result, and
//! "no nearby camera" is a structured 404, never a hard failure.

use actix_web::{HttpResponse, web};
use chrono::{Datelike as _, Local, NaiveDate};
use fire_map_incident_models::{Camera, Location};
use fire_map_locator::{LocateError, LocatorConfig};
use fire_map_scraper::ScrapeError;
use fire_map_scraper::call_log::{self, CallLogOptions};
use fire_map_scraper::incident_page;
use fire_map_server_models::{
    ApiError, ApiHealth, CallLogQueryParams, CameraQueryParams, DetailQueryParams,
};

use crate::AppState;

const NO_NEARBY_CAMERAS: &str = "No cameras are near the location of this incident.";

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /incident/{incident_number}`
pub async fn incident_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<DetailQueryParams>,
) -> HttpResponse {
    let incident_number = path.into_inner();
    match incident_page::fetch_incident(
        &state.http,
        &state.config.incident_url,
        &incident_number,
        params.use_12_hour_time,
    )
    .await
    {
        Ok(incident) => HttpResponse::Ok().json(incident),
        Err(e) => scrape_failure("Failed to extract incident details", &e),
    }
}

/// `GET /incident/{incident_number}/units`
pub async fn incident_units(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<DetailQueryParams>,
) -> HttpResponse {
    let incident_number = path.into_inner();
    match incident_page::fetch_units(
        &state.http,
        &state.config.incident_url,
        &incident_number,
        params.use_12_hour_time,
    )
    .await
    {
        Ok(units) => HttpResponse::Ok().json(units),
        Err(e) => scrape_failure("Failed to extract the unit timeline", &e),
    }
}

/// `GET /incident/{incident_number}/location`
///
/// An incident that neither the feed nor the geocoder can place still
/// returns 200, with null coordinates and no source tag.
pub async fn incident_location(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let incident_number = path.into_inner();
    match resolve_incident_location(&state, &incident_number).await {
        Ok(location) => HttpResponse::Ok().json(location),
        Err(response) => response,
    }
}

/// `GET /incident/{incident_number}/cameras`
///
/// Returns the closest camera pole's whole view group. A pole may carry
/// several views; clients pick by operator/URL.
pub async fn incident_cameras(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<CameraQueryParams>,
) -> HttpResponse {
    let incident_number = path.into_inner();

    let location = match resolve_incident_location(&state, &incident_number).await {
        Ok(location) => location,
        Err(response) => return response,
    };

    let (Some(latitude), Some(longitude)) = (location.latitude, location.longitude) else {
        // Can't measure distance to an unresolved incident.
        return HttpResponse::NotFound().json(ApiError::new(NO_NEARBY_CAMERAS));
    };

    match state
        .cameras
        .nearest(latitude, longitude, params.threshold_km())
    {
        Some(pole) => HttpResponse::Ok().json(&pole.cameras),
        None => HttpResponse::NotFound().json(ApiError::new(NO_NEARBY_CAMERAS)),
    }
}

/// `GET /incidents`
///
/// The whole call log for one date, defaulting each missing date part to
/// today's.
pub async fn incidents_for_date(
    state: web::Data<AppState>,
    params: web::Query<CallLogQueryParams>,
) -> HttpResponse {
    let today = Local::now().date_naive();
    let year = params.year.unwrap_or(today.year());
    let month = params.month.unwrap_or(today.month());
    let day = params.day.unwrap_or(today.day());

    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        return HttpResponse::BadRequest().json(ApiError::new(format!(
            "{month}/{day}/{year} is not a valid date"
        )));
    };

    match call_log::fetch_calls_for_date(
        &state.http,
        &state.config.call_log_url,
        date,
        CallLogOptions {
            dedupe: params.dedupe,
        },
    )
    .await
    {
        Ok(calls) => HttpResponse::Ok().json(calls),
        Err(e) => scrape_failure("Failed to extract the call log", &e),
    }
}

/// `GET /incidents/active`
pub async fn active_incidents(state: web::Data<AppState>) -> HttpResponse {
    match call_log::fetch_active_calls(
        &state.http,
        &state.config.call_log_url,
        CallLogOptions::default(),
    )
    .await
    {
        Ok(calls) => HttpResponse::Ok().json(calls),
        Err(e) => scrape_failure("Failed to extract active calls", &e),
    }
}

/// `GET /cameras`
///
/// Deliberate stub inherited from the original API: always an empty list.
pub async fn all_cameras() -> HttpResponse {
    HttpResponse::Ok().json(Vec::<Camera>::new())
}

/// `GET /favicon.ico`
pub async fn favicon() -> actix_web::Result<actix_files::NamedFile> {
    Ok(actix_files::NamedFile::open_async("assets/favicon.ico").await?)
}

/// Resolves an incident's coordinates: scrapes the dispatch address, then
/// runs the feed-first/geocode-fallback chain. `Unresolved` degrades to a
/// partial [`Location`]; other failures surface as ready-made responses.
async fn resolve_incident_location(
    state: &AppState,
    incident_number: &str,
) -> Result<Location, HttpResponse> {
    let incident = incident_page::fetch_incident(
        &state.http,
        &state.config.incident_url,
        incident_number,
        false,
    )
    .await
    .map_err(|e| scrape_failure("Failed to extract incident details", &e))?;

    let config = LocatorConfig {
        feed_url: state.config.feed_url.clone(),
        geocoder_url: state.config.geocoder_url.clone(),
    };

    match fire_map_locator::resolve(
        &state.http,
        &config,
        incident_number,
        incident.address.as_deref(),
    )
    .await
    {
        Ok(location) => Ok(location),
        Err(LocateError::Unresolved { .. }) => {
            log::warn!("No location found for incident {incident_number}");
            Ok(Location::default())
        }
        Err(e) => {
            log::error!("Failed to resolve a location for {incident_number}: {e}");
            Err(HttpResponse::BadGateway()
                .json(ApiError::new("Failed to resolve the incident location")))
        }
    }
}

/// Maps a scraper error to its response. Everything the scraper can fail
/// with is an upstream problem, so these are all 502s.
fn scrape_failure(context: &str, e: &ScrapeError) -> HttpResponse {
    log::error!("{context}: {e}");
    let message = match e {
        ScrapeError::Structure(_) => {
            "The upstream page did not have the expected structure (is the incident number valid?)"
        }
        ScrapeError::TimeFormat(_) => "The upstream page contained an unexpected time format",
        ScrapeError::Http(_) => "Failed to reach the upstream incident site",
    };
    HttpResponse::BadGateway().json(ApiError::new(message))
}
