//! Scrape orchestration: discover, fan out, join.

use super::{emit, ScrapeSession};
use crate::bus::{read_listing, read_sensor};
use crate::metrics::MetricsError;
use prometheus::core::Desc;
use prometheus::Opts;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Help text of the temperature metric.
pub const HELP: &str = "Temperature of the sensor.";

/// Variable labels of the temperature metric.
pub const LABEL_NAMES: [&str; 2] = ["sensor_id", "sensor_name"];

/// Settings a scraper needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Root of the `w1` devices tree.
    pub devices_path: PathBuf,
    /// Metric namespace (`<namespace>_temperature_celcius`).
    pub namespace: String,
    /// Upper bound on one scrape.
    pub scrape_timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            devices_path: PathBuf::from("/sys/bus/w1/devices/"),
            namespace: "onewire".to_string(),
            scrape_timeout: Duration::from_secs(10),
        }
    }
}

/// Collects 1-Wire temperatures on demand.
///
/// Holds no per-scrape state: every [`collect`](Self::collect) works on
/// the session it is given, so one scraper can serve overlapping requests.
#[derive(Debug)]
pub struct Scraper {
    config: ScraperConfig,
    opts: Opts,
    desc: Desc,
}

impl Scraper {
    /// Creates a scraper, validating the metric name.
    pub fn new(config: ScraperConfig) -> Result<Self, MetricsError> {
        let opts = Opts::new("celcius", HELP)
            .namespace(config.namespace.clone())
            .subsystem("temperature");

        let desc = Desc::new(
            opts.fq_name(),
            HELP.to_string(),
            LABEL_NAMES.iter().map(|l| l.to_string()).collect(),
            HashMap::new(),
        )?;

        Ok(Self { config, opts, desc })
    }

    /// Returns the scraper's settings.
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Returns the static descriptor of the temperature metric.
    pub fn describe(&self) -> &Desc {
        &self.desc
    }

    /// Returns the options the exposition layer builds its gauge from.
    pub fn opts(&self) -> &Opts {
        &self.opts
    }

    /// Runs one scrape into `session` under the configured timeout.
    pub async fn collect(&self, session: &mut ScrapeSession) {
        self.collect_within(session, self.config.scrape_timeout).await;
    }

    /// Runs one scrape into `session`, giving up on reads after `timeout`.
    ///
    /// Returns only once every worker has finished, with the session
    /// marked complete.
    pub async fn collect_within(&self, session: &mut ScrapeSession, timeout: Duration) {
        let deadline = Instant::now() + timeout;

        let sensors = match read_listing(&self.config.devices_path, deadline).await {
            Ok(sensors) => sensors,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read sensor listing");
                session.finish();
                return;
            }
        };

        tracing::debug!(count = sensors.len(), "Discovered sensors");

        let base: Arc<Path> = Arc::from(self.config.devices_path.as_path());
        let mut workers = JoinSet::new();

        for id in &sensors {
            let base = Arc::clone(&base);
            let id = id.clone();
            let sink = session.sink();

            workers.spawn(async move {
                match read_sensor(&base, &id, deadline).await {
                    Ok(reading) => emit(&sink, reading),
                    Err(e) => tracing::error!(sensor = %id, error = %e, "Failed to read sensor"),
                }
            });
        }

        session.set_sensors(sensors);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Sensor worker aborted");
            }
        }

        session.finish();
    }
}
