//! Incident detail page extractor.
//!
//! The detail page (`incidentDetail.asp?ID=<incident_number>`) is a fixed
//! sequence of layout tables. The third table holds six label/value rows of
//! incident metadata; the fourth holds a header row followed by one row per
//! dispatched unit, each with four `<p>` cells (name, dispatched, arrived,
//! in service). Everything is consumed positionally because the page offers
//! no ids, classes, or stable anchors to select on.

use fire_map_incident_models::{Incident, Unit};
use scraper::{ElementRef, Html};

use crate::{ScrapeError, element_text, parse_selector, strip_label, to_12_hour};

/// Marker character the page appends to the primary (lead-responding)
/// unit's name.
const PRIMARY_MARKER: char = '*';

/// Zero-based index of the incident metadata table on the detail page.
const DETAILS_TABLE_INDEX: usize = 2;

/// Zero-based index of the unit timeline table on the detail page.
const UNITS_TABLE_INDEX: usize = 3;

/// Fetches an incident detail page and extracts the incident metadata.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] if the fetch fails,
/// [`ScrapeError::Structure`] if the page layout is not the expected one,
/// or [`ScrapeError::TimeFormat`] if 12-hour conversion was requested and
/// the scraped time is malformed.
pub async fn fetch_incident(
    client: &reqwest::Client,
    base_url: &str,
    incident_number: &str,
    use_12_hour: bool,
) -> Result<Incident, ScrapeError> {
    let html = fetch_detail_page(client, base_url, incident_number).await?;
    parse_incident(&html, use_12_hour)
}

/// Fetches an incident detail page and extracts the per-unit dispatch
/// timeline.
///
/// # Errors
///
/// Same error conditions as [`fetch_incident`].
pub async fn fetch_units(
    client: &reqwest::Client,
    base_url: &str,
    incident_number: &str,
    use_12_hour: bool,
) -> Result<Vec<Unit>, ScrapeError> {
    let html = fetch_detail_page(client, base_url, incident_number).await?;
    parse_units(&html, use_12_hour)
}

async fn fetch_detail_page(
    client: &reqwest::Client,
    base_url: &str,
    incident_number: &str,
) -> Result<String, ScrapeError> {
    log::debug!("Fetching incident detail page for {incident_number}");
    let response = client
        .get(base_url)
        .query(&[("ID", incident_number)])
        .send()
        .await?
        .error_for_status()?;
    Ok(response.text().await?)
}

/// Extracts the [`Incident`] metadata from raw detail-page HTML.
///
/// When `use_12_hour` is set the incident time is reformatted to
/// "hh:MM AM/PM"; this is display-only and does not affect parsing.
///
/// # Errors
///
/// Returns [`ScrapeError::Structure`] if the metadata table or any of its
/// six rows is missing, or [`ScrapeError::TimeFormat`] when 12-hour
/// conversion fails.
pub fn parse_incident(html: &str, use_12_hour: bool) -> Result<Incident, ScrapeError> {
    let document = Html::parse_document(html);
    let details = nth_table(&document, DETAILS_TABLE_INDEX)?;

    let row_sel = parse_selector("tr")?;
    let rows: Vec<String> = details
        .select(&row_sel)
        .map(|row| element_text(&row))
        .collect();

    // Label/value rows in fixed page order.
    let field = |index: usize, label: &str| -> Result<Option<String>, ScrapeError> {
        let raw = rows.get(index).ok_or_else(|| {
            ScrapeError::Structure(format!("detail row {index} ({label}) missing"))
        })?;
        let value = strip_label(raw, label);
        Ok(if value.is_empty() { None } else { Some(value) })
    };

    let mut incident = Incident {
        incident_number: field(0, "Incident Number:")?,
        date: field(1, "Incident Date:")?,
        time: field(2, "Time:")?,
        address: field(3, "Address:")?,
        incident_type: field(4, "Type:")?,
        alarm_level: field(5, "Alarm Level:")?,
        active: None,
    };

    if use_12_hour {
        incident.time = to_12_hour(incident.time.as_deref())?;
    }

    Ok(incident)
}

/// Extracts the ordered unit timeline from raw detail-page HTML.
///
/// The primary unit (marked with `*` in the source) is placed first with
/// the marker stripped from its name; all other units keep document order.
///
/// # Errors
///
/// Returns [`ScrapeError::Structure`] if the units table is missing or a
/// unit row lacks its four `<p>` cells, or [`ScrapeError::TimeFormat`]
/// when 12-hour conversion fails.
pub fn parse_units(html: &str, use_12_hour: bool) -> Result<Vec<Unit>, ScrapeError> {
    let document = Html::parse_document(html);
    let table = nth_table(&document, UNITS_TABLE_INDEX)?;

    let row_sel = parse_selector("tr")?;
    let cell_sel = parse_selector("p")?;

    let mut units: Vec<Unit> = Vec::new();

    // First row is the column header.
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<Option<String>> = row
            .select(&cell_sel)
            .map(|cell| {
                let text = element_text(&cell).trim().to_owned();
                if text.is_empty() { None } else { Some(text) }
            })
            .collect();

        if cells.len() < 4 {
            return Err(ScrapeError::Structure(format!(
                "unit row has {} cells, expected 4",
                cells.len()
            )));
        }

        // A blank name cell normalizes to no name, same as the timeline
        // cells; only missing cells are structural failures.
        let raw_name = cells[0].clone();
        let primary = raw_name
            .as_deref()
            .is_some_and(|name| name.contains(PRIMARY_MARKER));

        let mut unit = Unit {
            name: raw_name
                .map(|name| name.replace(PRIMARY_MARKER, ""))
                .filter(|name| !name.is_empty()),
            primary,
            dispatched: cells[1].clone(),
            arrived: cells[2].clone(),
            in_service: cells[3].clone(),
        };

        if use_12_hour {
            unit.dispatched = to_12_hour(unit.dispatched.as_deref())?;
            unit.arrived = to_12_hour(unit.arrived.as_deref())?;
            unit.in_service = to_12_hour(unit.in_service.as_deref())?;
        }

        if primary {
            units.insert(0, unit);
        } else {
            units.push(unit);
        }
    }

    Ok(units)
}

/// Returns the `index`-th `<table>` in the document, or a
/// [`ScrapeError::Structure`] naming the missing index.
fn nth_table(document: &Html, index: usize) -> Result<ElementRef<'_>, ScrapeError> {
    let table_sel = parse_selector("table")?;
    document.select(&table_sel).nth(index).ok_or_else(|| {
        ScrapeError::Structure(format!(
            "expected at least {} tables, table {index} missing",
            index + 1
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A trimmed-down incident detail page with the same table layout as
    /// the live site: two chrome tables, the metadata table, and the unit
    /// timeline table.
    fn detail_page(units: &str) -> String {
        format!(
            r#"<html><body>
<table><tr><td>banner</td></tr></table>
<table><tr><td>nav</td></tr></table>
<table>
  <tr><td>Incident Number: F240012345</td></tr>
  <tr><td>Incident Date: 7/14/2024</td></tr>
  <tr><td>Time: 13:05</td></tr>
  <tr><td>Address: 400 BROAD ST</td></tr>
  <tr><td>Type: Aid Response</td></tr>
  <tr><td>Alarm Level: 1</td></tr>
</table>
<table>
  <tr><td>Unit</td><td>Dispatched</td><td>Arrived</td><td>In Service</td></tr>
  {units}
</table>
</body></html>"#
        )
    }

    const UNIT_ROWS: &str = r"
  <tr><td><p>E2</p><p>13:05</p><p>13:09</p><p>13:31</p></td></tr>
  <tr><td><p>M10*</p><p>13:05</p><p>13:11</p><p></p></td></tr>
  <tr><td><p>L4</p><p>13:06</p><p></p><p></p></td></tr>";

    #[test]
    fn parses_incident_metadata() {
        let incident = parse_incident(&detail_page(UNIT_ROWS), false).unwrap();
        assert_eq!(incident.incident_number.as_deref(), Some("F240012345"));
        assert_eq!(incident.date.as_deref(), Some("7/14/2024"));
        assert_eq!(incident.time.as_deref(), Some("13:05"));
        assert_eq!(incident.address.as_deref(), Some("400 BROAD ST"));
        assert_eq!(incident.incident_type.as_deref(), Some("Aid Response"));
        assert_eq!(incident.alarm_level.as_deref(), Some("1"));
        assert_eq!(incident.active, None);
    }

    #[test]
    fn reformats_incident_time_when_requested() {
        let incident = parse_incident(&detail_page(UNIT_ROWS), true).unwrap();
        assert_eq!(incident.time.as_deref(), Some("01:05 PM"));
    }

    #[test]
    fn primary_unit_sorts_first_with_marker_stripped() {
        let units = parse_units(&detail_page(UNIT_ROWS), false).unwrap();
        assert_eq!(units.len(), 3);

        assert_eq!(units[0].name.as_deref(), Some("M10"));
        assert!(units[0].primary);

        // Non-primary units keep document order.
        assert_eq!(units[1].name.as_deref(), Some("E2"));
        assert_eq!(units[2].name.as_deref(), Some("L4"));
        assert!(!units[1].primary);
        assert!(!units[2].primary);
    }

    #[test]
    fn blank_timeline_cells_become_none() {
        let units = parse_units(&detail_page(UNIT_ROWS), false).unwrap();
        let primary = &units[0];
        assert_eq!(primary.dispatched.as_deref(), Some("13:05"));
        assert_eq!(primary.arrived.as_deref(), Some("13:11"));
        assert_eq!(primary.in_service, None);
    }

    #[test]
    fn unit_times_convert_uniformly() {
        let units = parse_units(&detail_page(UNIT_ROWS), true).unwrap();
        assert_eq!(units[0].dispatched.as_deref(), Some("01:05 PM"));
        assert_eq!(units[0].in_service, None);
        assert_eq!(units[1].in_service.as_deref(), Some("01:31 PM"));
    }

    #[test]
    fn missing_tables_are_a_structure_error() {
        let html = "<html><body><table><tr><td>only one</td></tr></table></body></html>";
        assert!(matches!(
            parse_incident(html, false),
            Err(ScrapeError::Structure(_))
        ));
        assert!(matches!(
            parse_units(html, false),
            Err(ScrapeError::Structure(_))
        ));
    }

    #[test]
    fn blank_unit_name_normalizes_to_none() {
        let page = detail_page(
            "<tr><td><p></p><p>13:05</p><p></p><p></p></td></tr>
             <tr><td><p>E2</p><p>13:05</p><p>13:09</p><p>13:31</p></td></tr>",
        );
        let units = parse_units(&page, false).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, None);
        assert!(!units[0].primary);
        assert_eq!(units[0].dispatched.as_deref(), Some("13:05"));
        assert_eq!(units[1].name.as_deref(), Some("E2"));
    }

    #[test]
    fn short_unit_row_is_a_structure_error() {
        let page = detail_page("<tr><td><p>E2</p><p>13:05</p></td></tr>");
        assert!(matches!(
            parse_units(&page, false),
            Err(ScrapeError::Structure(_))
        ));
    }
}
