//! Publication-date filters for the videos table.
//!
//! Filters never touch the source table. They return a derived table holding
//! the matching rows in their original order.

use chrono::{DateTime, Datelike, Utc};
use charts_core::error::Result;
use charts_core::models::VideoTable;
use charts_core::time_utils::{in_window, month_window};
use tracing::debug;

const PUBLISHED_AT: &str = "published_at";

/// Videos published in the `[start of month, start of month + 31 days)`
/// window around `now`.
pub fn filter_month_window(table: &VideoTable, now: DateTime<Utc>) -> Result<VideoTable> {
    table.require(PUBLISHED_AT)?;
    let (start, end) = month_window(now);

    let filtered = table.try_filter(|video| Ok(in_window(video.published()?, start, end)))?;
    debug!(
        "Month window {} .. {} kept {} of {} videos",
        start,
        end,
        filtered.len(),
        table.len()
    );
    Ok(filtered)
}

/// [`filter_month_window`] against the system clock.
pub fn filter_current_month(table: &VideoTable) -> Result<VideoTable> {
    filter_month_window(table, Utc::now())
}

/// Videos whose UTC publication year is `year`.
pub fn filter_year(table: &VideoTable, year: i32) -> Result<VideoTable> {
    table.require(PUBLISHED_AT)?;
    let filtered = table.try_filter(|video| Ok(video.published()?.year() == year))?;
    debug!("Year {} kept {} of {} videos", year, filtered.len(), table.len());
    Ok(filtered)
}

/// Distinct publication years in the order they first appear.
pub fn available_years(table: &VideoTable) -> Result<Vec<i32>> {
    table.require(PUBLISHED_AT)?;
    let mut years = Vec::new();
    for video in table {
        let year = video.published()?.year();
        if !years.contains(&year) {
            years.push(year);
        }
    }
    Ok(years)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
