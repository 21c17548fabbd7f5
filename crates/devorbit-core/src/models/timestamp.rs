//! Serde helper for backend timestamps.
//!
//! The backend stores UTC times without an offset and sends them as
//! `2025-11-02T08:15:30.123456`. Offset forms such as `...Z` are accepted too
//! and converted to UTC. Values are written back in the naive form, so a
//! stored record parses to the same value it was written from.

use chrono::{DateTime, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    value.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}

/// Parse a naive or RFC 3339 timestamp as a UTC wall-clock time
pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_utc());
    }
    raw.parse::<NaiveDateTime>()
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 2)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    #[test]
    fn test_parse_naive_with_fraction() {
        assert_eq!(parse("2025-11-02T08:15:30.123456").unwrap(), at(8, 15, 30, 123456));
        assert_eq!(parse("2025-11-02T08:15:30").unwrap(), at(8, 15, 30, 0));
    }

    #[test]
    fn test_parse_offset_converts_to_utc() {
        assert_eq!(parse("2025-11-02T08:15:30Z").unwrap(), at(8, 15, 30, 0));
        assert_eq!(parse("2025-11-02T10:15:30+02:00").unwrap(), at(8, 15, 30, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("yesterday").is_err());
        assert!(parse("2025-11-02").is_err());
    }
}
