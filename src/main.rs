//! 1-Wire Temperature Exporter
//!
//! Serves the temperatures of all sensors on the first 1-Wire bus master
//! in Prometheus format.

use clap::Parser;
use onewire_exporter::{ExporterConfig, LogLevel, MetricsServer, Scraper};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Prometheus exporter for 1-Wire temperature sensors.
#[derive(Debug, Parser)]
#[command(name = "onewire-exporter", version, about)]
struct Cli {
    /// TOML configuration file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on for web interface and telemetry.
    #[arg(long = "web.listen-address")]
    listen_address: Option<String>,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path")]
    telemetry_path: Option<String>,

    /// Path to the 1-Wire devices directory.
    #[arg(long = "devices.path")]
    devices_path: Option<PathBuf>,

    /// Prefix of the exported metric names.
    #[arg(long)]
    namespace: Option<String>,

    /// Upper bound on a single scrape, in seconds.
    #[arg(long = "scrape.timeout")]
    scrape_timeout: Option<f64>,

    /// Only log messages with the given severity or above.
    #[arg(long = "log.level", value_enum)]
    log_level: Option<LogLevel>,
}

impl Cli {
    fn into_config(self) -> Result<ExporterConfig, onewire_exporter::ConfigError> {
        let mut config = match &self.config {
            Some(path) => ExporterConfig::from_file(path)?,
            None => ExporterConfig::default(),
        };

        if let Some(listen_address) = self.listen_address {
            config.listen_address = listen_address;
        }
        if let Some(telemetry_path) = self.telemetry_path {
            config.telemetry_path = telemetry_path;
        }
        if let Some(devices_path) = self.devices_path {
            config.devices_path = devices_path;
        }
        if let Some(namespace) = self.namespace {
            config.namespace = namespace;
        }
        if let Some(scrape_timeout) = self.scrape_timeout {
            config.scrape_timeout_secs = scrape_timeout;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.directive())),
        )
        .init();

    info!("Starting onewire_exporter v{}", onewire_exporter::VERSION);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    let (scraper_config, server_config) = match (config.scraper_config(), config.server_config()) {
        (Ok(scraper), Ok(server)) => (scraper, server),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!(
        devices = %scraper_config.devices_path.display(),
        timeout = ?scraper_config.scrape_timeout,
        "Reading 1-Wire sensors"
    );

    let scraper = match Scraper::new(scraper_config) {
        Ok(scraper) => scraper,
        Err(e) => {
            error!(error = %e, "Failed to create scraper");
            std::process::exit(1);
        }
    };

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let signal_tx = shutdown_tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = signal_tx.send(true);
    }) {
        warn!(error = %e, "Failed to install signal handler");
    }

    let shutdown = async move {
        let _ = shutdown_rx.changed().await;
        info!("Shutting down");
    };

    let server = MetricsServer::new(server_config, scraper);
    if let Err(e) = server.run(shutdown).await {
        error!(error = %e, "Failed to start http server");
        std::process::exit(1);
    }

    drop(shutdown_tx);
    info!("Stopped");
}
