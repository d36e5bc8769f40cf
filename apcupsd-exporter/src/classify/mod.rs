/// Canonical apcupsd status strings, in ordinal order.
///
/// The index of an entry is the value exported as `apc_status_numeric`, so
/// entries must only ever be appended.
pub const STATUS_VOCABULARY: [&str; 13] = [
    "online",
    "trim online",
    "boost",
    "trim",
    "onbatt",
    "overload",
    "lowbatt",
    "replacebatt",
    "nobatt",
    "slave",
    "slavedown",
    "commlost",
    "shutting down",
];

/// Where a reported status falls in [`STATUS_VOCABULARY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Known(usize),
    Unclassified,
}

impl StatusClass {
    pub fn ordinal(self) -> Option<usize> {
        match self {
            StatusClass::Known(i) => Some(i),
            StatusClass::Unclassified => None,
        }
    }

    /// The vocabulary entry this class refers to.
    pub fn label(self) -> Option<&'static str> {
        self.ordinal().map(|i| STATUS_VOCABULARY[i])
    }
}

/// Pure classification of a status string.
///
/// Rules:
/// - comparison is exact apart from ASCII case.
/// - no prefix or partial matches: `trim` is not `trim online`.
pub fn classify(status: &str) -> StatusClass {
    STATUS_VOCABULARY
        .iter()
        .position(|entry| entry.eq_ignore_ascii_case(status))
        .map_or(StatusClass::Unclassified, StatusClass::Known)
}
