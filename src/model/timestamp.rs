use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use regex::Regex;

/// Bracketed time-zone name annotation, e.g. `[Asia/Taipei]`
static ZONE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*\]").expect("zone annotation pattern is valid"));

/// Remove a `[Region/City]` annotation, keeping the numeric offset.
///
/// `2025-08-09T17:30:32.352+08:00[Asia/Taipei]` → `2025-08-09T17:30:32.352+08:00`
pub fn strip_zone_annotation(input: &str) -> Cow<'_, str> {
    ZONE_ANNOTATION.replace(input, "")
}

/// Parse an ISO-8601 date-time with a numeric offset. A zone-name
/// annotation is tolerated and dropped.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let cleaned = strip_zone_annotation(input.trim());
    DateTime::parse_from_rfc3339(cleaned.trim())
}

/// Wire format: RFC 3339, millisecond precision, numeric offset
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Current local date-time with its offset
pub fn now_local() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Short human form in the viewer's local zone
pub fn display_local(ts: &DateTime<FixedOffset>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Serde adapter storing timestamps in the wire format.
pub mod wire {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
