//! Projection of a [`UpsSnapshot`] onto the exported gauge families.
//!
//! Family names and label sets are what dashboards and alert rules are written
//! against; change them only together with those consumers.

use std::time::Duration;

use apcupsd_client::domain::fields::format_timestamp;
use apcupsd_client::UpsSnapshot;

use crate::classify::{StatusClass, STATUS_VOCABULARY};

/// Name, help text and label names of one exported gauge family.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricFamily {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

const UPS_LABELS: &[&str] = &["hostname", "upsname"];
const STATUS_LABELS: &[&str] = &["hostname", "upsname", "status", "model", "batterydate"];
const TRANSFER_LABELS: &[&str] = &[
    "hostname",
    "upsname",
    "lasttransfer",
    "timetransfertobattery",
    "timetransferfrombattery",
];

pub static STATUS: MetricFamily = MetricFamily {
    name: "apcups_status",
    help: "Current status of UPS",
    labels: STATUS_LABELS,
};
pub static STATUS_NUMERIC: MetricFamily = MetricFamily {
    name: "apc_status_numeric",
    help: "Current status of UPS",
    labels: STATUS_LABELS,
};
pub static COLLECT_SECONDS: MetricFamily = MetricFamily {
    name: "apcups_collect_time_seconds",
    help: "Time to collect stats for last poll of UPS network interface",
    labels: UPS_LABELS,
};
pub static NOMINAL_POWER: MetricFamily = MetricFamily {
    name: "apcups_nominal_power_watts",
    help: "Nominal UPS Power",
    labels: UPS_LABELS,
};
pub static BATTERY_CHARGE_PERCENT: MetricFamily = MetricFamily {
    name: "apcups_battery_charge_percent",
    help: "Percentage Battery Charge",
    labels: UPS_LABELS,
};
pub static LOAD_PERCENT: MetricFamily = MetricFamily {
    name: "apcups_load_percent",
    help: "Percentage Battery Load",
    labels: UPS_LABELS,
};
pub static TIME_ON_BATTERY: MetricFamily = MetricFamily {
    name: "apcups_time_on_battery_seconds",
    help: "Total time on UPS battery",
    labels: UPS_LABELS,
};
pub static TIME_LEFT: MetricFamily = MetricFamily {
    name: "apcups_time_left_seconds",
    help: "Time on UPS battery",
    labels: UPS_LABELS,
};
pub static CUM_TIME_ON_BATTERY: MetricFamily = MetricFamily {
    name: "apcups_cum_time_on_battery_seconds",
    help: "Cumulative Time on UPS battery",
    labels: UPS_LABELS,
};
pub static BATTERY_VOLTS: MetricFamily = MetricFamily {
    name: "apcups_battery_volts",
    help: "UPS Battery Voltage",
    labels: UPS_LABELS,
};
pub static LINE_VOLTS: MetricFamily = MetricFamily {
    name: "apcups_line_volts",
    help: "UPS Line Voltage",
    labels: UPS_LABELS,
};
pub static NOM_BATTERY_VOLTS: MetricFamily = MetricFamily {
    name: "apcups_nom_battery_volts",
    help: "UPS Nominal Battery Voltage",
    labels: UPS_LABELS,
};
pub static NOM_INPUT_VOLTS: MetricFamily = MetricFamily {
    name: "apcups_nom_input_volts",
    help: "UPS Nominal Input Voltage",
    labels: UPS_LABELS,
};
pub static NUM_TRANSFERS: MetricFamily = MetricFamily {
    name: "apcups_numtransfers",
    help: "Number of transfers to battery since apcupsd startup",
    labels: TRANSFER_LABELS,
};

/// Every family in exposition order.
pub static FAMILIES: [&MetricFamily; 14] = [
    &STATUS,
    &STATUS_NUMERIC,
    &COLLECT_SECONDS,
    &NOMINAL_POWER,
    &BATTERY_CHARGE_PERCENT,
    &LOAD_PERCENT,
    &TIME_ON_BATTERY,
    &TIME_LEFT,
    &CUM_TIME_ON_BATTERY,
    &BATTERY_VOLTS,
    &LINE_VOLTS,
    &NOM_BATTERY_VOLTS,
    &NOM_INPUT_VOLTS,
    &NUM_TRANSFERS,
];

#[derive(Debug, Clone, PartialEq)]
pub struct MetricObservation {
    pub family: &'static MetricFamily,
    pub value: f64,
    /// One value per `family.labels`, same order.
    pub label_values: Vec<String>,
}

/// All observations produced by one scrape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSet {
    observations: Vec<MetricObservation>,
}

impl MetricSet {
    fn push(&mut self, family: &'static MetricFamily, value: f64, label_values: Vec<String>) {
        debug_assert_eq!(family.labels.len(), label_values.len(), "{}", family.name);
        self.observations.push(MetricObservation {
            family,
            value,
            label_values,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricObservation> {
        self.observations.iter()
    }

    /// Observations of the family called `name`.
    pub fn family<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MetricObservation> + 'a {
        self.observations.iter().filter(move |o| o.family.name == name)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Build the full observation set for one snapshot.
///
/// `collect_time` is how long fetching the status report took.
pub fn map_snapshot(snapshot: &UpsSnapshot, class: StatusClass, collect_time: Duration) -> MetricSet {
    let mut set = MetricSet::default();

    let ups = || vec![snapshot.hostname.clone(), snapshot.ups_name.clone()];
    let status_labels = |status: &str| {
        vec![
            snapshot.hostname.clone(),
            snapshot.ups_name.clone(),
            status.to_string(),
            snapshot.ups_model.clone(),
            snapshot.battery_install_date.clone(),
        ]
    };

    let active = class.ordinal();
    for (i, status) in STATUS_VOCABULARY.iter().enumerate() {
        let value = if active == Some(i) { 1.0 } else { 0.0 };
        set.push(&STATUS, value, status_labels(status));
    }

    if let (Some(ordinal), Some(status)) = (class.ordinal(), class.label()) {
        set.push(&STATUS_NUMERIC, ordinal as f64, status_labels(status));
    }

    set.push(&COLLECT_SECONDS, collect_time.as_secs_f64(), ups());
    set.push(&NOMINAL_POWER, snapshot.nominal_power_watts, ups());
    set.push(&BATTERY_CHARGE_PERCENT, snapshot.battery_charge_percent, ups());
    set.push(&LOAD_PERCENT, snapshot.load_percent, ups());
    set.push(&TIME_ON_BATTERY, snapshot.time_on_battery.as_secs_f64(), ups());
    set.push(&TIME_LEFT, snapshot.time_left.as_secs_f64(), ups());
    set.push(&CUM_TIME_ON_BATTERY, snapshot.cumulative_time_on_battery.as_secs_f64(), ups());
    set.push(&BATTERY_VOLTS, snapshot.battery_voltage, ups());
    set.push(&LINE_VOLTS, snapshot.line_voltage, ups());
    set.push(&NOM_BATTERY_VOLTS, snapshot.nominal_battery_voltage, ups());
    set.push(&NOM_INPUT_VOLTS, snapshot.nominal_input_voltage, ups());

    set.push(
        &NUM_TRANSFERS,
        snapshot.transfer_count,
        vec![
            snapshot.hostname.clone(),
            snapshot.ups_name.clone(),
            snapshot.last_transfer_reason.clone(),
            format_timestamp(snapshot.transfer_to_battery_at),
            format_timestamp(snapshot.transfer_from_battery_at),
        ],
    );

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use apcupsd_client::RawStatus;
    use time::macros::datetime;

    fn snapshot(status: &str) -> UpsSnapshot {
        let raw: RawStatus = [
            ("STATUS", status),
            ("HOSTNAME", "host1"),
            ("UPSNAME", "ups1"),
            ("MODEL", "Back-UPS XS 950U"),
            ("BATTDATE", "2014-10-21"),
            ("BCHARGE", "100.0 Percent"),
            ("TIMELEFT", "1.25 minutes"),
            ("NUMXFERS", "4"),
            ("LASTXFER", "Low line voltage"),
        ]
        .into_iter()
        .collect();
        UpsSnapshot::from_raw(&raw).unwrap()
    }

    fn map(status: &str) -> MetricSet {
        let snap = snapshot(status);
        map_snapshot(&snap, classify(&snap.status), Duration::from_millis(250))
    }

    #[test]
    fn matched_status_lights_exactly_one_indicator() {
        let set = map("ONLINE");

        let indicators: Vec<_> = set.family("apcups_status").collect();
        assert_eq!(indicators.len(), STATUS_VOCABULARY.len());

        let lit: Vec<_> = indicators.iter().filter(|o| o.value == 1.0).collect();
        assert_eq!(lit.len(), 1);
        assert_eq!(lit[0].label_values[2], "online");
        assert!(indicators.iter().all(|o| o.value == 0.0 || o.value == 1.0));
    }

    #[test]
    fn ordinal_carries_index_and_matched_label() {
        let set = map("ONBATT");

        let ordinal: Vec<_> = set.family("apc_status_numeric").collect();
        assert_eq!(ordinal.len(), 1);
        assert_eq!(ordinal[0].value, 4.0);
        assert_eq!(
            ordinal[0].label_values,
            vec!["host1", "ups1", "onbatt", "Back-UPS XS 950U", "2014-10-21"]
        );
    }

    #[test]
    fn unclassified_status_has_no_lit_indicator_and_no_ordinal() {
        let set = map("weird");

        assert!(set.family("apcups_status").all(|o| o.value == 0.0));
        assert_eq!(set.family("apc_status_numeric").count(), 0);
    }

    #[test]
    fn every_other_family_has_one_observation() {
        let set = map("online");

        for family in FAMILIES.iter().skip(2) {
            assert_eq!(set.family(family.name).count(), 1, "{}", family.name);
        }
        assert_eq!(set.len(), STATUS_VOCABULARY.len() + 1 + 12);
    }

    #[test]
    fn gauges_use_snapshot_values_and_seconds() {
        let set = map("online");
        let value = |name: &str| set.family(name).next().unwrap().value;

        assert_eq!(value("apcups_battery_charge_percent"), 100.0);
        assert_eq!(value("apcups_time_left_seconds"), 75.0);
        assert_eq!(value("apcups_collect_time_seconds"), 0.25);
        assert_eq!(value("apcups_numtransfers"), 4.0);

        let charge = set.family("apcups_battery_charge_percent").next().unwrap();
        assert_eq!(charge.label_values, vec!["host1", "ups1"]);
    }

    #[test]
    fn transfer_labels_format_timestamps() {
        let mut snap = snapshot("online");
        snap.transfer_to_battery_at = datetime!(2016-08-30 17:21:35 +02:00);

        let set = map_snapshot(&snap, classify(&snap.status), Duration::ZERO);
        let transfers = set.family("apcups_numtransfers").next().unwrap();

        assert_eq!(
            transfers.label_values,
            vec![
                "host1",
                "ups1",
                "Low line voltage",
                "2016-08-30 17:21:35 +0200",
                "0001-01-01 00:00:00 +0000",
            ]
        );
    }

    #[test]
    fn every_observation_matches_its_label_arity() {
        let set = map("trim online");
        assert!(set.iter().all(|o| o.family.labels.len() == o.label_values.len()));
    }
}
