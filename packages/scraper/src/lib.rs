#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTML extraction for Seattle Fire Department incident pages.
//!
//! The SFD incident site is legacy ASP with no semantic markup, so both
//! extractors ([`incident_page`] and [`call_log`]) address tables, rows, and
//! cells positionally. That brittleness is contained here: callers only see
//! the [`fire_map_incident_models`] records, never the page layout.
//!
//! This crate fetches and parses; it has no awareness of the HTTP facade or
//! of location resolution.

pub mod call_log;
pub mod incident_page;

use chrono::NaiveTime;
use scraper::Selector;

/// Errors that can occur while fetching or extracting incident pages.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The fetched page did not have the expected table/row/cell structure.
    /// Either the upstream layout changed or the incident number is invalid.
    #[error("Unexpected page structure: {0}")]
    Structure(String),

    /// A scraped time string was not in 24-hour "HH:MM" form.
    #[error("Invalid time string: {0:?}")]
    TimeFormat(String),
}

/// Strips the first occurrence of `label` from scraped cell text, trims
/// surrounding whitespace, and removes embedded newlines.
///
/// Turns a labeled cell like `"Incident Number: F000000000\n"` into
/// `"F000000000"`.
#[must_use]
pub fn strip_label(raw: &str, label: &str) -> String {
    raw.replacen(label, "", 1).trim().replace('\n', "")
}

/// Converts a 24-hour "HH:MM" string to 12-hour "hh:MM AM/PM" form.
///
/// `None` passes through unchanged so callers can apply this uniformly to
/// timeline stages a unit never reached.
///
/// # Errors
///
/// Returns [`ScrapeError::TimeFormat`] if the input is not valid "HH:MM".
pub fn to_12_hour(time: Option<&str>) -> Result<Option<String>, ScrapeError> {
    let Some(time) = time else {
        return Ok(None);
    };
    let parsed = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| ScrapeError::TimeFormat(time.to_owned()))?;
    Ok(Some(parsed.format("%I:%M %p").to_string()))
}

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Structure(format!("invalid CSS selector '{selector}': {e}")))
}

/// Collects the full text content of an element, including nested children.
fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_label_and_newlines() {
        assert_eq!(
            strip_label("Incident Number: F123\n", "Incident Number:"),
            "F123"
        );
    }

    #[test]
    fn strips_only_first_label_occurrence() {
        assert_eq!(strip_label("Type: Type: Aid", "Type:"), "Type: Aid");
    }

    #[test]
    fn strip_label_without_label_just_cleans() {
        assert_eq!(strip_label("  E18 \n", "Address:"), "E18");
    }

    #[test]
    fn converts_afternoon_time() {
        assert_eq!(to_12_hour(Some("13:05")).unwrap().unwrap(), "01:05 PM");
    }

    #[test]
    fn converts_midnight_and_noon() {
        assert_eq!(to_12_hour(Some("00:00")).unwrap().unwrap(), "12:00 AM");
        assert_eq!(to_12_hour(Some("12:00")).unwrap().unwrap(), "12:00 PM");
    }

    #[test]
    fn passes_none_through() {
        assert!(to_12_hour(None).unwrap().is_none());
    }

    #[test]
    fn rejects_malformed_time() {
        assert!(matches!(
            to_12_hour(Some("25:99")),
            Err(ScrapeError::TimeFormat(_))
        ));
        assert!(matches!(
            to_12_hour(Some("soon")),
            Err(ScrapeError::TimeFormat(_))
        ));
    }
}
