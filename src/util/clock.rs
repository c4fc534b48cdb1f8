//! Wall-clock helpers for response timestamps.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Current UTC time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    format_rfc3339(OffsetDateTime::now_utc())
}

pub fn format_rfc3339(at: OffsetDateTime) -> String {
    // Rfc3339 only rejects years outside 0..=9999.
    at.format(&Rfc3339)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}
