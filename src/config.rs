//! Exporter configuration.
//!
//! Built once at startup from an optional TOML file and command-line
//! overrides, then handed to the scraper and server by value. Nothing
//! reads it through a global.

use crate::metrics::MetricsServerConfig;
use crate::scrape::ScraperConfig;
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Routes served besides the telemetry path.
const RESERVED_PATHS: [&str; 2] = ["/", "/health"];

/// Minimum severity that gets logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-sensor detail and scrape timings.
    Debug,
    /// Startup and shutdown.
    #[default]
    Info,
    /// Warnings only.
    Warn,
    /// Errors only.
    Error,
    /// Nothing.
    None,
}

impl LogLevel {
    /// Returns the equivalent `tracing` filter directive.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::None => "off",
        }
    }
}

/// Full exporter configuration, as read from a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Address to listen on, `host:port` or `:port`.
    pub listen_address: String,
    /// Path under which metrics are served.
    pub telemetry_path: String,
    /// Root of the `w1` devices tree.
    pub devices_path: PathBuf,
    /// Metric namespace.
    pub namespace: String,
    /// Upper bound on one scrape, in seconds.
    pub scrape_timeout_secs: f64,
    /// Log verbosity.
    pub log_level: LogLevel,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_address: ":9100".to_string(),
            telemetry_path: "/metrics".to_string(),
            devices_path: PathBuf::from("/sys/bus/w1/devices/"),
            namespace: "onewire".to_string(),
            scrape_timeout_secs: 10.0,
            log_level: LogLevel::Info,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    /// The listen address does not resolve to a socket address.
    #[error("invalid listen address {0:?}")]
    InvalidListenAddress(String),
    /// The telemetry path is relative or collides with another route.
    #[error("invalid telemetry path {0:?} (must start with '/' and not be '/' or '/health')")]
    InvalidTelemetryPath(String),
    /// The metric namespace is empty.
    #[error("namespace must not be empty")]
    EmptyNamespace,
    /// The scrape timeout is zero, negative or not a number.
    #[error("invalid scrape timeout {0} (must be a positive number of seconds)")]
    InvalidScrapeTimeout(f64),
}

impl ExporterConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        self.scrape_timeout()?;
        self.telemetry_path()?;
        if self.namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        Ok(())
    }

    /// Resolves the listen address.
    ///
    /// A bare `:port` binds every IPv4 interface.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_listen_address(&self.listen_address)
    }

    /// Returns the telemetry path if it can be routed.
    ///
    /// `/` and `/health` are taken by the landing page and health check.
    pub fn telemetry_path(&self) -> Result<&str, ConfigError> {
        let path = self.telemetry_path.as_str();
        if !path.starts_with('/') || RESERVED_PATHS.contains(&path) {
            return Err(ConfigError::InvalidTelemetryPath(path.to_string()));
        }
        Ok(path)
    }

    /// Returns the scrape timeout as a duration.
    pub fn scrape_timeout(&self) -> Result<Duration, ConfigError> {
        if !(self.scrape_timeout_secs > 0.0) {
            return Err(ConfigError::InvalidScrapeTimeout(self.scrape_timeout_secs));
        }
        Duration::try_from_secs_f64(self.scrape_timeout_secs)
            .map_err(|_| ConfigError::InvalidScrapeTimeout(self.scrape_timeout_secs))
    }

    /// Settings for the scraper.
    pub fn scraper_config(&self) -> Result<ScraperConfig, ConfigError> {
        Ok(ScraperConfig {
            devices_path: self.devices_path.clone(),
            namespace: self.namespace.clone(),
            scrape_timeout: self.scrape_timeout()?,
        })
    }

    /// Settings for the HTTP server.
    pub fn server_config(&self) -> Result<MetricsServerConfig, ConfigError> {
        Ok(MetricsServerConfig {
            bind_addr: self.bind_addr()?,
            telemetry_path: self.telemetry_path()?.to_string(),
        })
    }
}

fn parse_listen_address(addr: &str) -> Result<SocketAddr, ConfigError> {
    let full = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };

    full.to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| ConfigError::InvalidListenAddress(addr.to_string()))
}
