pub mod classify;
pub mod config;
pub mod exposition;
pub mod mapping;
pub mod metrics_server;
pub mod observability;
pub mod scrape;
pub mod server;

pub use mapping::{MetricObservation, MetricSet};
pub use scrape::{scrape, ScrapeError, StatusSource};
