use std::time::Duration;

use tokio::{io::AsyncWriteExt, net::TcpStream};

use crate::domain::RawStatus;
use crate::error::NisError;
use crate::nis::frame::{response_frames, write_command};
use crate::nis::status_text::{decode_status, DecodeMode};
use crate::nis::STATUS_COMMAND;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Issues one-shot queries against an apcupsd NIS endpoint.
///
/// Holds no connection between calls; every query dials, reads the full
/// response and hangs up.
#[derive(Debug, Clone)]
pub struct NisClient {
    connect_timeout: Duration,
    read_timeout: Option<Duration>,
    decode_mode: DecodeMode,
}

impl Default for NisClient {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: None,
            decode_mode: DecodeMode::default(),
        }
    }
}

impl NisClient {
    pub fn new(connect_timeout: Duration, read_timeout: Option<Duration>, decode_mode: DecodeMode) -> Self {
        Self {
            connect_timeout,
            read_timeout,
            decode_mode,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    pub fn decode_mode(&self) -> DecodeMode {
        self.decode_mode
    }

    async fn connect(&self, addr: &str) -> Result<TcpStream, NisError> {
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| {
                NisError::Connection(format!(
                    "timed out after {:?} connecting to {addr}",
                    self.connect_timeout
                ))
            })?
            .map_err(|e| NisError::Connection(format!("unable to connect to {addr}: {e}")))?;
        if let Err(e) = stream.set_nodelay(true) {
            tracing::trace!(addr, error = %e, "could not disable Nagle");
        }
        Ok(stream)
    }

    /// Fetch the raw status report from `addr` (`host:port`).
    pub async fn query_status(&self, addr: &str) -> Result<RawStatus, NisError> {
        let mut stream = self.connect(addr).await?;
        write_command(&mut stream, STATUS_COMMAND).await?;

        let raw = decode_status(response_frames(&mut stream, self.read_timeout), self.decode_mode).await?;

        // Best-effort close; the terminator has already been read.
        if let Err(e) = stream.shutdown().await {
            tracing::trace!(addr, error = %e, "shutdown after status query failed");
        }

        tracing::debug!(addr, fields = raw.len(), "status query complete");
        Ok(raw)
    }
}
