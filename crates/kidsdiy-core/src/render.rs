// ── Derived render fields ──
//
// Pure helpers pages use to turn wire models into display strings:
// absolute media URLs, joined names, formatted timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use url::Url;

/// Resolve a backend media path against the media host.
///
/// Absolute URLs pass through; empty paths yield `None`.
pub fn media_url(base: &Url, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_owned());
    }
    let base = base.as_str().trim_end_matches('/');
    Some(format!("{base}/{}", path.trim_start_matches('/')))
}

/// "First Last", or `fallback` when both are blank.
pub fn full_name(first: &str, last: &str, fallback: &str) -> String {
    let name = format!("{} {}", first.trim(), last.trim());
    let name = name.trim();
    if name.is_empty() {
        fallback.to_owned()
    } else {
        name.to_owned()
    }
}

/// Display text for a lookup value that may be a name, an `{id, name}`
/// object or a bare id.
pub fn lookup_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("name").and_then(lookup_label),
        _ => None,
    }
}

/// Labels joined with ", ".
pub fn join_labels(values: &[Value]) -> String {
    values
        .iter()
        .filter_map(lookup_label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// "Oct 18, 2026 10:00". Unparseable input is returned unchanged.
pub fn format_datetime(raw: &str) -> String {
    const OUT: &str = "%b %d, %Y %H:%M";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(OUT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map_or_else(|| raw.to_owned(), |dt| dt.format(OUT).to_string())
}

/// "October 18, 2026" from `YYYY-MM-DD`. Unparseable input is returned unchanged.
pub fn format_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_or_else(|_| raw.to_owned(), |d| d.format("%B %-d, %Y").to_string())
}

/// Human-readable byte size for attachments.
pub fn file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes;
    let mut unit = 0;
    while size >= 1024 && unit < UNITS.len() - 1 {
        size /= 1024;
        unit += 1;
    }
    format!("{size} {}", UNITS[unit])
}
