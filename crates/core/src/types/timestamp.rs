//! Wire format for price validity timestamps.
//!
//! Timestamps are written as RFC 3339 in UTC with millisecond precision
//! (`2021-01-01T00:00:00.000Z`). Reading accepts any RFC 3339 offset and
//! bare `YYYY-MM-DD` dates, which are taken as midnight UTC.

use chrono::{DateTime, NaiveDate, ParseError, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Format a timestamp the way it appears on the wire.
#[must_use]
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a wire timestamp.
///
/// # Errors
///
/// Returns `ParseError` if the input is neither RFC 3339 nor a bare date.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(err) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or(err),
    }
}

/// Serde `serialize_with` hook.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

/// Serde `deserialize_with` hook.
///
/// # Errors
///
/// Fails if the string is not a valid wire timestamp.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_uses_millis_and_z() {
        let ts = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format(&ts), "2021-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_parse_offsets_to_utc() {
        let parsed = parse("2021-01-01T02:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_date() {
        let parsed = parse("2021-12-31").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2021, 12, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("not a date").is_err());
    }
}
