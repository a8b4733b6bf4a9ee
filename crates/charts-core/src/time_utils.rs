use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Width of the "current month" window. Deliberately fixed rather than the
/// true calendar-month length.
pub const MONTH_WINDOW_DAYS: i64 = 31;

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse an ISO 8601 / RFC 3339 timestamp string into a UTC [`DateTime`].
///
/// Accepts the `Z`-suffix form, any fixed UTC offset, a space instead of the
/// `T` separator (`2023-03-10 15:00:10+00:00`, as pandas writes it), naive
/// date-times (interpreted as UTC) and bare dates.
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const OFFSET_FMTS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%:z"];
    for fmt in OFFSET_FMTS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    const NAIVE_FMTS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in NAIVE_FMTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    debug!("could not parse timestamp {:?}", s);
    None
}

// ── Windows ───────────────────────────────────────────────────────────────────

/// First instant (00:00:00 UTC on day 1) of the calendar month containing `now`.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// The `[start, end)` window used for "this month" charts.
///
/// `start` is the first instant of the current month; `end` is exactly
/// [`MONTH_WINDOW_DAYS`] days later, which can spill into the next month.
pub fn month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_month(now);
    (start, start + Duration::days(MONTH_WINDOW_DAYS))
}

/// `true` when `ts` lies in the half-open interval `[start, end)`.
pub fn in_window(ts: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    ts >= start && ts < end
}

// ── Tests ─────────────────────────────────────────────────────────────────────
