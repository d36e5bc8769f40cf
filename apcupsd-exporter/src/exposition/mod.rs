use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::mapping::{MetricSet, FAMILIES};

/// Content type of [`render`] output.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

#[derive(thiserror::Error, Debug)]
pub enum ExpositionError {
    #[error("metric registry error: {0}")]
    Registry(#[from] prometheus::Error),
    #[error("encoded metrics are not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render one scrape's metrics in the Prometheus text format.
///
/// A registry is built for this call only, so nothing from an earlier scrape
/// can leak into the output. Families without observations are left out.
pub fn render(set: &MetricSet) -> Result<String, ExpositionError> {
    let registry = Registry::new();

    for family in FAMILIES.iter() {
        let mut observations = set.family(family.name).peekable();
        if observations.peek().is_none() {
            continue;
        }

        let gauge = GaugeVec::new(Opts::new(family.name, family.help), family.labels)?;
        registry.register(Box::new(gauge.clone()))?;

        for obs in observations {
            let values: Vec<&str> = obs.label_values.iter().map(String::as_str).collect();
            gauge.get_metric_with_label_values(&values)?.set(obs.value);
        }
    }

    let mut buf = Vec::with_capacity(4096);
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
