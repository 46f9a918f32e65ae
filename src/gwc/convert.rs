//! Conversions from matched substrings to typed values.
//!
//! Every function here returns `None` instead of an error: a value that does not
//! convert is treated exactly like a value that was never on the page.

use chrono::{DateTime, NaiveDateTime, Utc};

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const BYTES_PER_MEGABYTE: f64 = 1_000_000.0;

/// Parses an unsigned integer, ignoring `,` grouping separators.
pub fn parse_integer(text: &str) -> Option<u64> {
    text.trim().replace(',', "").parse::<u64>().ok()
}

/// Parses a decimal number, ignoring `,` grouping separators.
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Converts `"<magnitude> <unit>"` to whole seconds.
///
/// Accepts second, minute, hour and day in singular or plural form. Fractional
/// magnitudes are allowed and the result is truncated, so `"1.5 minutes"` is 90.
pub fn parse_duration_seconds(text: &str) -> Option<u64> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (magnitude, unit) = text.split_at(split);
    let magnitude = parse_float(magnitude)?;

    let unit = unit.trim().to_ascii_lowercase();
    let multiplier = match unit.strip_suffix('s').unwrap_or(&unit) {
        "second" => 1.0,
        "minute" => SECONDS_PER_MINUTE,
        "hour" => SECONDS_PER_HOUR,
        "day" => SECONDS_PER_DAY,
        _ => return None,
    };

    let seconds = (magnitude * multiplier).trunc();
    (seconds >= 0.0 && seconds <= u64::MAX as f64).then_some(seconds as u64)
}

/// Parses an RFC 1123 date such as `Mon, 2 Jan 2006 15:04:05 GMT`.
///
/// The weekday is not checked against the date.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let (_, date) = text.trim().split_once(", ")?;
    NaiveDateTime::parse_from_str(date, "%d %b %Y %H:%M:%S GMT")
        .ok()
        .map(|t| t.and_utc())
}

/// Returns the trimmed text, or `None` when nothing is left.
pub fn parse_text(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Converts decimal megabytes (10^6) to bytes, rounding to the nearest byte.
pub fn megabytes_to_bytes(megabytes: f64) -> Option<u64> {
    let bytes = (megabytes * BYTES_PER_MEGABYTE).round();
    (bytes >= 0.0 && bytes <= u64::MAX as f64).then_some(bytes as u64)
}
