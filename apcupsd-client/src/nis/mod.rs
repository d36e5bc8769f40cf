//! apcupsd Network Information Server protocol.
//!
//! Every message in either direction is a big-endian `u16` length followed by
//! that many bytes. The daemon answers a command with a run of text frames and
//! closes the run with a zero-length frame.

pub mod client;
pub mod frame;
pub mod status_text;

pub use client::NisClient;
pub use status_text::DecodeMode;

/// Command that asks the daemon for its status report.
pub const STATUS_COMMAND: &str = "status";
