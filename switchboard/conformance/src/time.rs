//! Wire formats for timestamps.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// An RFC 3339 timestamp as it appears in JSON bodies.
///
/// Parsing accepts lowercase `t` and `z` and, for timestamps without an
/// offset, assumes UTC. Serialization writes `Z` for a zero offset and only
/// as many fractional digits as the value needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rfc3339(pub DateTime<FixedOffset>);

impl Rfc3339 {
    /// Parses a timestamp leniently.
    ///
    /// ## Errors
    ///
    /// Returns an error if `s` is neither RFC 3339 nor an offset-less
    /// `YYYY-MM-DDTHH:MM:SS[.f]` timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let normalized = s.trim().to_ascii_uppercase();
        match DateTime::parse_from_rfc3339(&normalized) {
            Ok(dt) => Ok(Self(dt)),
            Err(e) => NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| Self(naive.and_utc().fixed_offset()))
                .map_err(|_| e),
        }
    }
}

impl fmt::Display for Rfc3339 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl From<DateTime<FixedOffset>> for Rfc3339 {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }
}

impl From<Rfc3339> for DateTime<FixedOffset> {
    fn from(value: Rfc3339) -> Self {
        value.0
    }
}

impl Serialize for Rfc3339 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rfc3339 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Formats a timestamp the way HTTP date headers expect,
/// e.g. `Fri, 26 Aug 2022 14:38:00 GMT`.
pub fn format_rfc1123(value: &DateTime<Utc>) -> String {
    value.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses an HTTP date header.
///
/// ## Errors
///
/// Returns an error if `value` is not an RFC 1123 date.
pub fn parse_rfc1123(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc2822(value.trim()).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_min_utc_round_trip() {
        let min = Rfc3339::parse("0001-01-01T00:00:00Z").unwrap();
        assert_eq!(min.to_string(), "0001-01-01T00:00:00Z");
        assert_eq!(serde_json::to_string(&min).unwrap(), "\"0001-01-01T00:00:00Z\"");
    }

    #[test]
    fn test_lowercase_separators() {
        let max = Rfc3339::parse("9999-12-31t23:59:59.999z").unwrap();
        assert_eq!(max.to_string(), "9999-12-31T23:59:59.999Z");
    }

    #[test]
    fn test_offsets_are_kept() {
        let positive = Rfc3339::parse("0001-01-01T00:00:00+14:00").unwrap();
        assert_eq!(positive.0.offset().local_minus_utc(), 14 * 3600);
        assert_eq!(positive.to_string(), "0001-01-01T00:00:00+14:00");

        let negative = Rfc3339::parse("0001-01-01t00:00:00-14:00").unwrap();
        assert_eq!(negative.0.offset().local_minus_utc(), -14 * 3600);
    }

    #[test]
    fn test_missing_offset_is_utc() {
        let value = Rfc3339::parse("2000-01-01T00:00:00").unwrap();
        assert_eq!(value.to_string(), "2000-01-01T00:00:00Z");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Rfc3339::parse("201O-18-90D00:89:56.9AX").is_err());
        assert!(serde_json::from_str::<Rfc3339>("\"not a date\"").is_err());
    }

    #[test]
    fn test_null_deserializes_to_none() {
        let value: Option<Rfc3339> = serde_json::from_str("null").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_rfc1123() {
        let value = Utc.with_ymd_and_hms(2022, 8, 26, 14, 38, 0).unwrap();
        let header = format_rfc1123(&value);
        assert_eq!(header, "Fri, 26 Aug 2022 14:38:00 GMT");
        assert_eq!(parse_rfc1123(&header).unwrap(), value);
    }
}
