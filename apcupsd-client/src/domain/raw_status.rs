use std::collections::HashMap;

/// Keys the snapshot builder reads out of a status report.
pub mod keys {
    pub const STATUS: &str = "STATUS";
    pub const NOMPOWER: &str = "NOMPOWER";
    pub const BCHARGE: &str = "BCHARGE";
    pub const TONBATT: &str = "TONBATT";
    pub const TIMELEFT: &str = "TIMELEFT";
    pub const CUMONBATT: &str = "CUMONBATT";
    pub const LOADPCT: &str = "LOADPCT";
    pub const BATTV: &str = "BATTV";
    pub const LINEV: &str = "LINEV";
    pub const NOMBATTV: &str = "NOMBATTV";
    pub const NOMINV: &str = "NOMINV";
    pub const HOSTNAME: &str = "HOSTNAME";
    pub const UPSNAME: &str = "UPSNAME";
    pub const MODEL: &str = "MODEL";
    pub const LASTXFER: &str = "LASTXFER";
    pub const XONBATT: &str = "XONBATT";
    pub const XOFFBATT: &str = "XOFFBATT";
    pub const NUMXFERS: &str = "NUMXFERS";
    pub const BATTDATE: &str = "BATTDATE";
}

/// Untyped `KEY -> value` pairs from one status query.
///
/// Values are stored trimmed. A later insert for the same key replaces the
/// earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStatus {
    fields: HashMap<String, String>,
}

impl RawStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.fields
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    /// Value for `key`, or the empty string when the daemon did not report it.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for RawStatus {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = RawStatus::new();
        for (k, v) in iter {
            raw.insert(k.as_ref(), v.as_ref());
        }
        raw
    }
}
