use std::io;

/// Transport-level failure while talking to the NIS daemon.
#[derive(thiserror::Error, Debug)]
pub enum NisError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl NisError {
    /// A clean EOF in the middle of a read means the peer hung up mid-frame;
    /// everything else is the socket failing under us.
    pub(crate) fn from_io(what: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => {
                NisError::Protocol(format!("connection closed while reading {what}"))
            }
            _ => NisError::Connection(format!("failed reading {what}: {err}")),
        }
    }
}

/// A recognized status field held a value that could not be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {key} value '{value}': {reason}")]
pub struct FieldParseError {
    pub key: String,
    pub value: String,
    pub reason: String,
}

impl FieldParseError {
    pub(crate) fn new(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
