// Timestamps as carried by the feed, and the display/duration strings derived from them
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::TransformError;

const DATE_FORMAT: &str = "%d-%m-%Y";
const TIME_FORMAT: &str = "%I:%M%p";
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

const MILLIS_PER_MINUTE: i64 = 60 * 1000;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

/// Calendar fields plus the UTC offset they were written in.
///
/// Display formatting reads the local fields as-is; the offset only matters
/// when two timestamps are compared as instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    pub fn new(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }

    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }
}

impl FromStr for Timestamp {
    type Err = TransformError;

    // Accepts RFC 3339 (fractional seconds allowed) or minute precision;
    // an offset-less value is read as UTC.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(parsed));
        }
        if let Ok(parsed) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z") {
            return Ok(Self(parsed));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|naive| Self(naive.and_utc().fixed_offset()))
            .ok_or_else(|| TransformError::InvalidTimestamp(format!("{:?} is not ISO-8601", s)))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.fixed_offset())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTime {
    pub date: String,
    pub time: String,
}

/// Fails with `InvalidTimestamp` when the feed left `field` out.
pub fn require_timestamp<'a>(
    timestamp: Option<&'a Timestamp>,
    field: &str,
) -> Result<&'a Timestamp, TransformError> {
    timestamp.ok_or_else(|| TransformError::InvalidTimestamp(format!("{} is missing", field)))
}

/// Renders `dd-mm-yyyy` and a 12-hour `hh:mmAM` clock from the timestamp's own local fields.
pub fn display_time(timestamp: &Timestamp) -> DisplayTime {
    let local = timestamp.as_datetime();

    DisplayTime {
        date: local.format(DATE_FORMAT).to_string(),
        time: local.format(TIME_FORMAT).to_string(),
    }
}

/// Elapsed time as `HH:M`.
///
/// Arrival minus departure, signed; hours wrap at 24 and minutes are not padded.
/// Consumers of the feed depend on this exact rendering.
pub fn flight_duration(departure: &Timestamp, arrival: &Timestamp) -> String {
    let difference = arrival.timestamp_millis() - departure.timestamp_millis();
    let minutes = difference / MILLIS_PER_MINUTE % 60;
    let hours = difference / MILLIS_PER_HOUR % 24;

    format!("{:0>2}:{}", hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_time_uses_local_fields() {
        let departure = ts("2014-01-02T07:45:00.000+04:00");
        let display = display_time(&departure);
        assert_eq!(display.date, "02-01-2014");
        assert_eq!(display.time, "07:45AM");
    }

    #[test_case("2024-03-09T00:05:00+00:00", "12:05AM"; "#1 midnight")]
    #[test_case("2024-03-09T12:00:00+00:00", "12:00PM"; "#2 noon")]
    #[test_case("2024-03-09T23:59:00-05:00", "11:59PM"; "#3 late evening negative offset")]
    #[test_case("2024-03-09T09:07:00+05:30", "09:07AM"; "#4 half hour offset")]
    fn test_twelve_hour_clock(raw: &str, expected: &str) {
        let display = display_time(&ts(raw));
        assert_eq!(display.time, expected);
    }

    #[test]
    fn test_missing_timestamp_is_rejected() {
        let err = require_timestamp(None, "arrival").unwrap_err();
        assert_eq!(
            err,
            TransformError::InvalidTimestamp("arrival is missing".to_string())
        );
    }

    #[test]
    fn test_offsetless_timestamp_reads_as_utc() {
        let parsed = ts("2024-01-01T10:00:00");
        assert_eq!(parsed.as_datetime().offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_unparseable_timestamp() {
        let result = "02/01/2014 07:45".parse::<Timestamp>();
        assert!(matches!(result, Err(TransformError::InvalidTimestamp(_))));
    }

    #[test_case("2024-01-01T10:00+00:00", "2024-01-01T12:30+00:00", "02:30"; "#1 same day")]
    #[test_case("2024-01-01T23:00:00+00:00", "2024-01-02T01:00:00+00:00", "02:0"; "#2 past midnight unpadded minutes")]
    #[test_case("2014-01-02T07:45:00.000+04:00", "2014-01-02T11:55:00.000+00:00", "08:10"; "#3 across offsets")]
    #[test_case("2024-01-01T10:00:00+00:00", "2024-01-01T10:05:00+00:00", "00:5"; "#4 single digit minutes")]
    #[test_case("2024-01-01T00:00:00+00:00", "2024-01-02T03:15:00+00:00", "03:15"; "#5 wraps at 24 hours")]
    #[test_case("2024-01-01T12:30:00+00:00", "2024-01-01T10:00:00+00:00", "-2:-30"; "#6 arrival before departure")]
    fn test_flight_duration(departure: &str, arrival: &str, expected: &str) {
        assert_eq!(flight_duration(&ts(departure), &ts(arrival)), expected);
    }
}
