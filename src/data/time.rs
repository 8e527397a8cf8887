use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp, tolerating surrounding whitespace.
///
/// Returns `None` for anything unparseable, so one bad timestamp degrades
/// ordering for that record only instead of failing the batch.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
