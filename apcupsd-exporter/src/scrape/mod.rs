use std::time::Instant;

use apcupsd_client::{FieldParseError, NisClient, NisError, RawStatus, UpsSnapshot};

use crate::classify::classify;
use crate::mapping::{map_snapshot, MetricSet};

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("fetch error: {0}")]
    Fetch(#[from] NisError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] FieldParseError),
}

impl ScrapeError {
    /// Short tag for logs and the outcome label of self-metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Fetch(NisError::Connection(_)) => "connection",
            ScrapeError::Fetch(NisError::Protocol(_)) => "protocol",
            ScrapeError::Snapshot(_) => "field_parse",
        }
    }
}

/// Something that can hand back a daemon's raw status report.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, target: &str) -> Result<RawStatus, NisError>;
}

#[async_trait::async_trait]
impl StatusSource for NisClient {
    async fn fetch(&self, target: &str) -> Result<RawStatus, NisError> {
        self.query_status(target).await
    }
}

/// Run one scrape of `target` (`host:port`).
///
/// Either every metric for the target comes back, or an error does; there is
/// no partial result.
pub async fn scrape<S>(source: &S, target: &str) -> Result<MetricSet, ScrapeError>
where
    S: StatusSource + ?Sized,
{
    let started = Instant::now();
    let raw = source.fetch(target).await?;
    let collect_time = started.elapsed();

    let snapshot = UpsSnapshot::from_raw(&raw)?;
    tracing::debug!(addr = %target, ?snapshot, "decoded status report");

    let class = classify(&snapshot.status);
    if class.ordinal().is_none() {
        tracing::debug!(addr = %target, status = %snapshot.status, "status not in vocabulary");
    }

    Ok(map_snapshot(&snapshot, class, collect_time))
}
