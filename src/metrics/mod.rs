//! Prometheus exposition of scrape results.
//!
//! Every request to the telemetry path runs one scrape and renders it
//! through a registry built for that request alone.
//!
//! # Metrics Exposed
//!
//! - `onewire_temperature_celcius{sensor_id, sensor_name}` - Temperature of
//!   each sensor that could be read, in degrees Celsius. The namespace
//!   prefix is configurable.
//!
//! # Example
//!
//! ```no_run
//! use onewire_exporter::metrics::render;
//! use onewire_exporter::scrape::{ScrapeSession, Scraper, ScraperConfig};
//!
//! # async fn run() -> Result<(), onewire_exporter::metrics::MetricsError> {
//! let scraper = Scraper::new(ScraperConfig::default())?;
//!
//! let mut session = ScrapeSession::new();
//! scraper.collect(&mut session).await;
//!
//! let body = render(&scraper, session)?;
//! println!("{}", body);
//! # Ok(())
//! # }
//! ```

mod collector;
mod server;

pub use collector::{render, MetricsError, SessionCollector};
pub use server::{MetricsServer, MetricsServerConfig, ServerError};
