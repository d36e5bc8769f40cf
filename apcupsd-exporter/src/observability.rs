use tracing_subscriber::EnvFilter;

/// Levels used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_DIRECTIVES: &str = "apcupsd_exporter=info,apcupsd_client=info";

/// Build the log filter from a `RUST_LOG`-style value.
///
/// A usable value replaces the defaults entirely, so
/// `RUST_LOG=apcupsd_client=debug` surfaces per-query events.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

pub fn init_tracing() {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(from_env.as_deref()))
        .with_target(false)
        .init();
}
