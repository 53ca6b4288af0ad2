//! Daily call-log extractor.
//!
//! The real-time 911 log (`getRecsForDatePub.asp`) serves one page per
//! date. The third table holds the call rows; each row's cells carry a
//! `closed` or `active` class depending on whether the call has cleared.
//! Cell positions within a row are fixed: 0 = timestamp, 1 = incident
//! number, 2 = alarm level, 3 = unit roster, 4 = address, 5 = type. The
//! timestamp and roster cells are not extracted here.
//!
//! The upstream log is known to repeat a row when a call's unit roster is
//! updated mid-incident, so the same incident number can appear more than
//! once. De-duplication is opt-in via [`CallLogOptions::dedupe`] rather
//! than silently applied.

use std::collections::HashSet;

use chrono::{Days, Local, NaiveDate};
use fire_map_incident_models::Incident;
use scraper::Html;

use crate::{ScrapeError, element_text, parse_selector};

/// Zero-based index of the call table on the log page.
const CALLS_TABLE_INDEX: usize = 2;

/// Options for call-log extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallLogOptions {
    /// Collapse repeated incident numbers, keeping the first row seen.
    /// Off by default to match the upstream log verbatim.
    pub dedupe: bool,
}

/// Fetches the call log for a date and extracts its incident summaries.
///
/// Returns an empty list when the page has no call table at all, which is
/// how the site renders dates with no data yet.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] if the fetch fails.
pub async fn fetch_calls_for_date(
    client: &reqwest::Client,
    base_url: &str,
    date: NaiveDate,
    options: CallLogOptions,
) -> Result<Vec<Incident>, ScrapeError> {
    use chrono::Datelike as _;

    let inc_date = format!("{}/{}/{}", date.month(), date.day(), date.year());
    log::debug!("Fetching call log for {inc_date}");

    let response = client
        .get(base_url)
        .query(&[("incDate", inc_date.as_str()), ("rad1", "des")])
        .send()
        .await?
        .error_for_status()?;
    let html = response.text().await?;

    parse_call_log(&html, options)
}

/// Fetches all currently active calls.
///
/// Unions today's and yesterday's logs, since calls opened shortly before
/// midnight are still listed under the previous date.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] if either fetch fails.
pub async fn fetch_active_calls(
    client: &reqwest::Client,
    base_url: &str,
    options: CallLogOptions,
) -> Result<Vec<Incident>, ScrapeError> {
    let today = Local::now().date_naive();
    let yesterday = today - Days::new(1);

    let mut calls = fetch_calls_for_date(client, base_url, today, options).await?;
    calls.extend(fetch_calls_for_date(client, base_url, yesterday, options).await?);
    calls.retain(|call| call.active == Some(true));

    Ok(calls)
}

/// Extracts incident summaries from raw call-log HTML.
///
/// Every returned [`Incident`] has `active` populated: a row is closed if
/// any of its cells carry the `closed` class, otherwise active. Rows with
/// neither class or with too few cells are skipped, not errors — the page
/// pads its layout with decorative rows.
///
/// # Errors
///
/// Returns [`ScrapeError::Structure`] only if a CSS selector fails to
/// parse, which would be a bug here rather than an upstream change.
pub fn parse_call_log(html: &str, options: CallLogOptions) -> Result<Vec<Incident>, ScrapeError> {
    let document = Html::parse_document(html);

    let table_sel = parse_selector("table")?;
    let Some(table) = document.select(&table_sel).nth(CALLS_TABLE_INDEX) else {
        // No data published for the requested date yet.
        return Ok(Vec::new());
    };

    let row_sel = parse_selector("tr")?;
    let closed_sel = parse_selector("td.closed")?;
    let active_sel = parse_selector("td.active")?;

    let mut calls: Vec<Incident> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for row in table.select(&row_sel) {
        let mut active = false;
        let mut cells: Vec<String> = row
            .select(&closed_sel)
            .map(|cell| element_text(&cell).trim().to_owned())
            .collect();

        if cells.is_empty() {
            cells = row
                .select(&active_sel)
                .map(|cell| element_text(&cell).trim().to_owned())
                .collect();
            active = true;
        }

        if cells.len() < 6 {
            log::trace!("Skipping call-log row with {} tagged cells", cells.len());
            continue;
        }

        let incident_number = non_blank(&cells[1]);

        if options.dedupe
            && let Some(number) = &incident_number
            && !seen.insert(number.clone())
        {
            continue;
        }

        calls.push(Incident {
            incident_number,
            date: None,
            time: None,
            address: non_blank(&cells[4]),
            incident_type: non_blank(&cells[5]),
            alarm_level: non_blank(&cells[2]),
            active: Some(active),
        });
    }

    Ok(calls)
}

fn non_blank(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_page(rows: &str) -> String {
        format!(
            r"<html><body>
<table><tr><td>banner</td></tr></table>
<table><tr><td>date picker</td></tr></table>
<table>{rows}</table>
</body></html>"
        )
    }

    fn call_row(class: &str, number: &str) -> String {
        format!(
            r#"<tr>
  <td class="{class}">7/14/2024 1:05:00 PM</td>
  <td class="{class}">{number}</td>
  <td class="{class}">1</td>
  <td class="{class}">E2 M10*</td>
  <td class="{class}">400 Broad St</td>
  <td class="{class}">Aid Response</td>
</tr>"#
        )
    }

    #[test]
    fn extracts_closed_and_active_rows() {
        let rows = format!(
            "{}{}",
            call_row("active", "F240012346"),
            call_row("closed", "F240012345")
        );
        let calls = parse_call_log(&log_page(&rows), CallLogOptions::default()).unwrap();

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].incident_number.as_deref(), Some("F240012346"));
        assert_eq!(calls[0].active, Some(true));
        assert_eq!(calls[1].incident_number.as_deref(), Some("F240012345"));
        assert_eq!(calls[1].active, Some(false));
    }

    #[test]
    fn maps_fixed_cell_positions() {
        let calls = parse_call_log(
            &log_page(&call_row("closed", "F240012345")),
            CallLogOptions::default(),
        )
        .unwrap();

        let call = &calls[0];
        assert_eq!(call.alarm_level.as_deref(), Some("1"));
        assert_eq!(call.address.as_deref(), Some("400 Broad St"));
        assert_eq!(call.incident_type.as_deref(), Some("Aid Response"));
        // Timestamp and unit roster cells are intentionally dropped.
        assert_eq!(call.date, None);
        assert_eq!(call.time, None);
    }

    #[test]
    fn missing_call_table_yields_empty_list() {
        let html = "<html><body><table><tr><td>banner</td></tr></table></body></html>";
        let calls = parse_call_log(html, CallLogOptions::default()).unwrap();
        assert!(calls.is_empty());
    }

    #[test]
    fn untagged_rows_are_skipped() {
        let rows = format!(
            "<tr><td>Sort by</td></tr>{}",
            call_row("closed", "F240012345")
        );
        let calls = parse_call_log(&log_page(&rows), CallLogOptions::default()).unwrap();
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn duplicate_rows_survive_by_default() {
        let rows = format!(
            "{}{}",
            call_row("active", "F240012345"),
            call_row("active", "F240012345")
        );
        let calls = parse_call_log(&log_page(&rows), CallLogOptions::default()).unwrap();
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn dedupe_keeps_first_row_per_incident() {
        let rows = format!(
            "{}{}{}",
            call_row("active", "F240012345"),
            call_row("closed", "F240012345"),
            call_row("closed", "F240012399")
        );
        let calls = parse_call_log(&log_page(&rows), CallLogOptions { dedupe: true }).unwrap();

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].incident_number.as_deref(), Some("F240012345"));
        assert_eq!(calls[0].active, Some(true));
        assert_eq!(calls[1].incident_number.as_deref(), Some("F240012399"));
    }
}
