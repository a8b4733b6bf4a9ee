/// Format an integer count with thousands separators.
///
/// ```
/// use charts_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Short form for chart labels: `950`, `12.3K`, `4.5M`, `1.2B`.
///
/// ```
/// use charts_core::formatting::format_compact;
///
/// assert_eq!(format_compact(950), "950");
/// assert_eq!(format_compact(12_345), "12.3K");
/// assert_eq!(format_compact(4_500_000), "4.5M");
/// ```
pub fn format_compact(value: u64) -> String {
    const UNITS: &[(u64, &str)] = &[(1_000, "K"), (1_000_000, "M"), (1_000_000_000, "B")];
    let Some(mut unit) = UNITS.iter().rposition(|&(scale, _)| value >= scale) else {
        return value.to_string();
    };

    let scaled = |unit: usize| {
        let tenths = (value as f64 * 10.0 / UNITS[unit].0 as f64).round();
        tenths / 10.0
    };
    // 999_950 rounds to 1000.0K; show it as 1.0M instead.
    if scaled(unit) >= 1000.0 && unit + 1 < UNITS.len() {
        unit += 1;
    }
    format!("{:.1}{}", scaled(unit), UNITS[unit].1)
}

/// Optional average for display: `"n/a"` when the table was empty.
pub fn format_average(value: Option<u64>) -> String {
    value.map(format_count).unwrap_or_else(|| "n/a".to_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
