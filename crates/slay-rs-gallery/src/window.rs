//! Parsing for the "latest N" query window.

/// Parse a raw count taken from a path or query string.
///
/// Blank, non-numeric and negative values collapse to `0`, which
/// `BoundedRecordLog::list_latest` treats as "use the default window".
pub fn latest_count(raw: Option<&str>) -> i64 {
    raw.map(str::trim)
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(0)
}
