//! Timestamp codec: seconds <-> canonical `mm:ss.SSS` strings.
//!
//! [`format`] always emits the canonical form. [`parse`] is lenient and
//! degrades malformed input to `0.0`; use [`try_parse`] when a caller
//! needs to tell a malformed timestamp apart from a literal zero.

use crate::error::CoreError;

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

/// Format a non-negative number of seconds as `mm:ss.SSS`.
///
/// Seconds are converted to whole milliseconds with rounding before being
/// split, so `12.7665` becomes `00:12.767` rather than `00:12.766`.
/// Minutes are not capped; 100 minutes or more render with more digits.
/// Negative and NaN inputs clamp to zero.
pub fn format(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round().max(0.0) as u64;
    let minutes = total_ms / MS_PER_MINUTE as u64;
    let secs = (total_ms % MS_PER_MINUTE as u64) / MS_PER_SECOND as u64;
    let millis = total_ms % MS_PER_SECOND as u64;
    format!("{minutes:02}:{secs:02}.{millis:03}")
}

/// Parse a timestamp into seconds, returning `0.0` for malformed input.
///
/// Accepts `mm:ss.SSS` and `mm:ss`, and anything else that splits into
/// two integer-led halves on `:` (so `"5:3"` is 303 seconds).
pub fn parse(text: &str) -> f64 {
    try_parse(text).unwrap_or(0.0)
}

/// Parse a timestamp into seconds, reporting malformed input as an error.
pub fn try_parse(text: &str) -> Result<f64, CoreError> {
    let malformed = || CoreError::Timestamp(text.to_string());

    let mut parts = text.split(':');
    let (Some(minutes_part), Some(seconds_part), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let minutes = leading_int(minutes_part).ok_or_else(malformed)?;

    let (secs_text, millis_text) = match seconds_part.split_once('.') {
        Some((s, m)) => (s, Some(m)),
        None => (seconds_part, None),
    };
    let secs = leading_int(secs_text).ok_or_else(malformed)?;
    let millis = match millis_text {
        Some(m) => leading_int(&format!("{m:0<3}")).ok_or_else(malformed)?,
        None => 0,
    };

    let total_ms = minutes
        .checked_mul(MS_PER_MINUTE)
        .and_then(|ms| ms.checked_add(secs.checked_mul(MS_PER_SECOND)?))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(malformed)?;
    Ok(total_ms as f64 / 1000.0)
}

/// Where a seek to `timestamp` should land, or `None` if the timestamp is
/// malformed. A literal zero seeks to the start.
pub fn seek_target(timestamp: &str) -> Option<f64> {
    try_parse(timestamp.trim()).ok()
}

/// Coerce `mm:ss` to `mm:ss.000`; other input is returned unchanged.
pub fn with_millis(timestamp: &str) -> String {
    if timestamp.contains('.') {
        timestamp.to_string()
    } else {
        format!("{timestamp}.000")
    }
}

/// Integer value of the leading digits of `text`, after optional leading
/// whitespace and sign. Trailing garbage is ignored; no digits is `None`.
fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}
