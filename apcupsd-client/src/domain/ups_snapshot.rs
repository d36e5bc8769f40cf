use std::time::Duration;

use time::OffsetDateTime;

use crate::domain::fields::{parse_duration, parse_magnitude, parse_timestamp};
use crate::domain::raw_status::{keys, RawStatus};
use crate::error::FieldParseError;

/// Typed view of one status report.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsSnapshot {
    /// Lowercased `STATUS`, e.g. `online` or `onbatt`.
    pub status: String,

    pub nominal_power_watts: f64,
    pub battery_charge_percent: f64,
    pub load_percent: f64,
    pub battery_voltage: f64,
    pub line_voltage: f64,
    pub nominal_battery_voltage: f64,
    pub nominal_input_voltage: f64,

    pub time_on_battery: Duration,
    pub time_left: Duration,
    pub cumulative_time_on_battery: Duration,

    pub transfer_to_battery_at: OffsetDateTime,
    pub transfer_from_battery_at: OffsetDateTime,

    pub hostname: String,
    pub ups_name: String,
    pub ups_model: String,
    pub last_transfer_reason: String,
    pub battery_install_date: String,
    pub transfer_count: f64,
}

impl UpsSnapshot {
    /// Build a snapshot from raw daemon fields.
    ///
    /// Missing numeric fields read as zero; the first malformed one fails the
    /// whole build.
    pub fn from_raw(raw: &RawStatus) -> Result<Self, FieldParseError> {
        let magnitude = |key: &str| parse_magnitude(key, raw.get(key));
        let duration = |key: &str| parse_duration(key, raw.get(key));

        Ok(UpsSnapshot {
            status: raw.get(keys::STATUS).to_lowercase(),
            nominal_power_watts: magnitude(keys::NOMPOWER)?,
            battery_charge_percent: magnitude(keys::BCHARGE)?,
            time_on_battery: duration(keys::TONBATT)?,
            time_left: duration(keys::TIMELEFT)?,
            cumulative_time_on_battery: duration(keys::CUMONBATT)?,
            load_percent: magnitude(keys::LOADPCT)?,
            battery_voltage: magnitude(keys::BATTV)?,
            line_voltage: magnitude(keys::LINEV)?,
            nominal_battery_voltage: magnitude(keys::NOMBATTV)?,
            nominal_input_voltage: magnitude(keys::NOMINV)?,
            hostname: raw.get(keys::HOSTNAME).to_string(),
            ups_name: raw.get(keys::UPSNAME).to_string(),
            ups_model: raw.get(keys::MODEL).to_string(),
            last_transfer_reason: raw.get(keys::LASTXFER).to_string(),
            transfer_to_battery_at: parse_timestamp(raw.get(keys::XONBATT)),
            transfer_from_battery_at: parse_timestamp(raw.get(keys::XOFFBATT)),
            transfer_count: magnitude(keys::NUMXFERS)?,
            battery_install_date: raw.get(keys::BATTDATE).to_string(),
        })
    }
}

impl TryFrom<&RawStatus> for UpsSnapshot {
    type Error = FieldParseError;

    fn try_from(raw: &RawStatus) -> Result<Self, Self::Error> {
        UpsSnapshot::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::ZERO_TIMESTAMP;
    use time::macros::datetime;

    fn back_ups_report() -> RawStatus {
        [
            ("STATUS", "ONLINE"),
            ("NOMPOWER", "480 Watts"),
            ("BCHARGE", "100.0 Percent"),
            ("TONBATT", "0 seconds"),
            ("TIMELEFT", "104.6 Minutes"),
            ("CUMONBATT", "0 seconds"),
            ("LOADPCT", "5.0 Percent Load Capacity"),
            ("BATTV", "13.5 Volts"),
            ("LINEV", "242.0 Volts"),
            ("NOMBATTV", "12.0 Volts"),
            ("NOMINV", "230 Volts"),
            ("HOSTNAME", "beaker.murf.org"),
            ("UPSNAME", "backups-950"),
            ("MODEL", "Back-UPS XS 950U"),
            ("LASTXFER", "Unacceptable line voltage changes"),
            ("XONBATT", "2016-08-30 17:21:35 +0200"),
            ("XOFFBATT", "N/A"),
            ("NUMXFERS", "2"),
            ("BATTDATE", "2014-10-21"),
            ("SERIALNO", "3B1443X05291"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn full_report_is_typed() {
        let s = UpsSnapshot::from_raw(&back_ups_report()).unwrap();

        assert_eq!(s.status, "online");
        assert_eq!(s.nominal_power_watts, 480.0);
        assert_eq!(s.battery_charge_percent, 100.0);
        assert_eq!(s.load_percent, 5.0);
        assert_eq!(s.battery_voltage, 13.5);
        assert_eq!(s.line_voltage, 242.0);
        assert_eq!(s.nominal_battery_voltage, 12.0);
        assert_eq!(s.nominal_input_voltage, 230.0);
        assert_eq!(s.time_on_battery, Duration::ZERO);
        assert_eq!(s.time_left, Duration::from_secs(6276));
        assert_eq!(s.transfer_to_battery_at, datetime!(2016-08-30 17:21:35 +02:00));
        assert_eq!(s.transfer_from_battery_at, ZERO_TIMESTAMP);
        assert_eq!(s.ups_model, "Back-UPS XS 950U");
        assert_eq!(s.last_transfer_reason, "Unacceptable line voltage changes");
        assert_eq!(s.battery_install_date, "2014-10-21");
        assert_eq!(s.transfer_count, 2.0);
    }

    #[test]
    fn empty_report_defaults_everything() {
        let s = UpsSnapshot::from_raw(&RawStatus::new()).unwrap();

        assert_eq!(s.status, "");
        assert_eq!(s.nominal_power_watts, 0.0);
        assert_eq!(s.cumulative_time_on_battery, Duration::ZERO);
        assert_eq!(s.transfer_to_battery_at, ZERO_TIMESTAMP);
        assert_eq!(s.hostname, "");
    }

    #[test]
    fn malformed_numeric_field_fails_the_build() {
        let mut raw = back_ups_report();
        raw.insert("LINEV", "unknown Volts");

        let err = UpsSnapshot::from_raw(&raw).unwrap_err();
        assert_eq!(err.key, "LINEV");
    }

    #[test]
    fn malformed_duration_field_fails_the_build() {
        let mut raw = back_ups_report();
        raw.insert("TIMELEFT", "soon");

        let err = UpsSnapshot::try_from(&raw).unwrap_err();
        assert_eq!(err.key, "TIMELEFT");
    }

    #[test]
    fn status_is_lowercased() {
        let raw: RawStatus = [("STATUS", "TRIM ONLINE")].into_iter().collect();
        let s = UpsSnapshot::from_raw(&raw).unwrap();
        assert_eq!(s.status, "trim online");
    }
}
