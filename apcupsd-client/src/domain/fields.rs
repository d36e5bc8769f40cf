use std::time::Duration;

use time::{format_description::BorrowedFormatItem, macros::datetime, macros::format_description, OffsetDateTime};

use crate::error::FieldParseError;

/// Layout apcupsd uses for `XONBATT`/`XOFFBATT`, e.g. `2016-08-30 17:21:35 +0200`.
pub const TIMESTAMP_LAYOUT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
);

/// Stand-in for a transfer time the daemon did not report.
pub const ZERO_TIMESTAMP: OffsetDateTime = datetime!(0001-01-01 00:00:00 UTC);

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Parse a value such as `13.5 Volts` or `100.0 Percent`.
///
/// Rules:
/// - empty input is `0.0`.
/// - everything after the first space is a unit label and is ignored.
/// - the leading token must be a float.
pub fn parse_magnitude(key: &str, raw: &str) -> Result<f64, FieldParseError> {
    if raw.is_empty() {
        return Ok(0.0);
    }

    let number = raw.split(' ').next().unwrap_or(raw);
    number
        .parse::<f64>()
        .map_err(|e| FieldParseError::new(key, raw, e.to_string()))
}

/// Parse a value such as `30 seconds` or `104.6 Minutes`.
///
/// Only the first letter of the unit counts: `s`, `m` or `h`, any case.
/// Empty input is a zero duration.
pub fn parse_duration(key: &str, raw: &str) -> Result<Duration, FieldParseError> {
    if raw.is_empty() {
        return Ok(Duration::ZERO);
    }

    let mut tokens = raw.split_whitespace();
    let number = tokens.next().unwrap_or_default();
    let unit = tokens
        .next()
        .ok_or_else(|| FieldParseError::new(key, raw, "missing time unit"))?;

    let value: f64 = number
        .parse()
        .map_err(|e: std::num::ParseFloatError| FieldParseError::new(key, raw, e.to_string()))?;

    let seconds_per_unit = match unit.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('s') => 1.0,
        Some('m') => 60.0,
        Some('h') => 3600.0,
        _ => return Err(FieldParseError::new(key, raw, format!("unknown time unit '{unit}'"))),
    };

    // Round to whole nanoseconds so decimal minutes land on exact seconds.
    let nanos = (value * seconds_per_unit * NANOS_PER_SECOND).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
        return Err(FieldParseError::new(key, raw, "duration out of range"));
    }

    Ok(Duration::from_nanos(nanos as u64))
}

/// Parse a transfer timestamp. Anything that does not fit [`TIMESTAMP_LAYOUT`]
/// (including the daemon's `N/A`) becomes [`ZERO_TIMESTAMP`] instead of an error.
pub fn parse_timestamp(raw: &str) -> OffsetDateTime {
    OffsetDateTime::parse(raw, TIMESTAMP_LAYOUT).unwrap_or(ZERO_TIMESTAMP)
}

pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(TIMESTAMP_LAYOUT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_default_to_zero() {
        assert_eq!(parse_magnitude("BCHARGE", ""), Ok(0.0));
        assert_eq!(parse_duration("TONBATT", ""), Ok(Duration::ZERO));
    }

    #[test]
    fn magnitude_drops_unit_suffix() {
        assert_eq!(parse_magnitude("BCHARGE", "100.0 Percent"), Ok(100.0));
        assert_eq!(parse_magnitude("NOMPOWER", "480 Watts"), Ok(480.0));
        assert_eq!(parse_magnitude("LOADPCT", "5.0 Percent Load Capacity"), Ok(5.0));
        assert_eq!(parse_magnitude("NUMXFERS", "3"), Ok(3.0));
    }

    #[test]
    fn magnitude_rejects_non_numeric_and_names_the_key() {
        let err = parse_magnitude("BATTV", "abc Volts").unwrap_err();
        assert_eq!(err.key, "BATTV");
        assert_eq!(err.value, "abc Volts");
    }

    #[test]
    fn duration_uses_first_letter_of_unit() {
        assert_eq!(parse_duration("TONBATT", "30 seconds"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("TIMELEFT", "1.25 minutes"), Ok(Duration::from_secs(75)));
        assert_eq!(parse_duration("TIMELEFT", "104.6 Minutes"), Ok(Duration::from_secs(6276)));
        assert_eq!(parse_duration("CUMONBATT", "2 Hours"), Ok(Duration::from_secs(7200)));
    }

    #[test]
    fn duration_rejects_bad_number_unit_or_sign() {
        assert!(parse_duration("TONBATT", "ten seconds").is_err());
        assert!(parse_duration("TONBATT", "10 days").is_err());
        assert!(parse_duration("TONBATT", "10").is_err());
        assert!(parse_duration("TONBATT", "-5 seconds").is_err());
    }

    #[test]
    fn timestamp_parses_fixed_layout() {
        assert_eq!(
            parse_timestamp("2016-08-30 17:21:35 +0200"),
            datetime!(2016-08-30 17:21:35 +02:00)
        );
    }

    #[test]
    fn unparseable_timestamp_is_zero_not_error() {
        assert_eq!(parse_timestamp("N/A"), ZERO_TIMESTAMP);
        assert_eq!(parse_timestamp(""), ZERO_TIMESTAMP);
    }

    #[test]
    fn format_uses_the_parse_layout() {
        assert_eq!(format_timestamp(ZERO_TIMESTAMP), "0001-01-01 00:00:00 +0000");
        assert_eq!(
            format_timestamp(datetime!(2023-11-02 08:15:00 -05:00)),
            "2023-11-02 08:15:00 -0500"
        );
    }
}
