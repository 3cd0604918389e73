//! 1-Wire Temperature Exporter Library
//!
//! Reads temperature sensors attached to a 1-Wire bus through the Linux
//! `w1` sysfs interface and exposes them as Prometheus gauges.
//!
//! # Architecture
//!
//! Every scrape request runs the full pipeline on fresh state:
//!
//! ```text
//! request → scrape (listing → per-sensor workers → sink) → metrics → response
//!                              ↓
//!                         bus (sysfs reads)
//! ```
//!
//! # Design Principles
//!
//! - **Best effort**: a sensor that cannot be read is left out, it never
//!   fails the scrape
//! - **Stateless scrapes**: nothing survives from one request to the next
//! - **Bounded latency**: every file read runs against the scrape deadline
//!
//! # Example
//!
//! ```no_run
//! use onewire_exporter::{render, ScrapeSession, Scraper, ScraperConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let scraper = Scraper::new(ScraperConfig::default())?;
//!
//! let mut session = ScrapeSession::new();
//! scraper.collect(&mut session).await;
//!
//! for sample in session.samples() {
//!     println!("{} = {}", sample.sensor_id, sample.value);
//! }
//!
//! print!("{}", render(&scraper, session)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod metrics;
pub mod scrape;

#[cfg(test)]
mod testing;

// Re-export commonly used types at crate root
pub use bus::{BusError, SensorId, SensorReading};
pub use config::{ConfigError, ExporterConfig, LogLevel};
pub use metrics::{render, MetricsError, MetricsServer, MetricsServerConfig};
pub use scrape::{ScrapeSession, Scraper, ScraperConfig, TemperatureSample};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
