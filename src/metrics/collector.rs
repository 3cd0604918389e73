//! Collector over a finished scrape.

use crate::scrape::{ScrapeSession, Scraper, TemperatureSample, LABEL_NAMES};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, GaugeVec, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A descriptor, registration or encoding failure.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Exposes the samples of one completed session.
///
/// Lives exactly as long as the registry of the request that produced it.
/// Describes itself with the scraper's descriptor, so the registry checks
/// every request against the same metric definition.
pub struct SessionCollector {
    desc: Desc,
    temperature: GaugeVec,
}

impl SessionCollector {
    /// Builds the temperature gauge for `samples`.
    pub fn new(scraper: &Scraper, samples: &[TemperatureSample]) -> Result<Self, MetricsError> {
        let temperature = GaugeVec::new(scraper.opts().clone(), &LABEL_NAMES)?;

        for sample in samples {
            temperature
                .with_label_values(&[sample.sensor_id.as_str(), sample.sensor_name.as_str()])
                .set(sample.value);
        }

        Ok(Self {
            desc: scraper.describe().clone(),
            temperature,
        })
    }
}

impl Collector for SessionCollector {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.desc]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.temperature.collect()
    }
}

/// Renders a completed session in Prometheus text format.
pub fn render(scraper: &Scraper, session: ScrapeSession) -> Result<String, MetricsError> {
    debug_assert!(session.is_complete(), "rendering an unfinished scrape");

    let registry = Registry::new();
    let collector = SessionCollector::new(scraper, session.samples())?;
    registry.register(Box::new(collector))?;

    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
