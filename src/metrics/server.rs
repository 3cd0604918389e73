//! HTTP server for the Prometheus scrape endpoint.

use super::render;
use crate::scrape::{ScrapeSession, Scraper};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Header in which Prometheus announces its own scrape timeout.
const SCRAPE_TIMEOUT_HEADER: &str = "x-prometheus-scrape-timeout-seconds";

/// Subtracted from the announced timeout so the response still arrives in time.
const SCRAPE_TIMEOUT_OFFSET: Duration = Duration::from_millis(250);

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen socket could not be bound.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Configuration for the metrics server.
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
    /// Path the scrape endpoint is served under.
    pub telemetry_path: String,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], 9100).into(),
            telemetry_path: "/metrics".to_string(),
        }
    }
}

/// Shared state of the request handlers.
#[derive(Clone)]
struct AppState {
    scraper: Arc<Scraper>,
    landing_page: String,
}

/// HTTP server exposing 1-Wire temperatures.
pub struct MetricsServer {
    config: MetricsServerConfig,
    scraper: Arc<Scraper>,
}

impl MetricsServer {
    /// Creates a new metrics server.
    pub fn new(config: MetricsServerConfig, scraper: Scraper) -> Self {
        Self {
            config,
            scraper: Arc::new(scraper),
        }
    }

    /// Builds the router: landing page, telemetry path and `/health`.
    pub fn router(&self) -> Router {
        let state = AppState {
            scraper: Arc::clone(&self.scraper),
            landing_page: landing_page(&self.config.telemetry_path),
        };

        Router::new()
            .route("/", get(landing_handler))
            .route(&self.config.telemetry_path, get(metrics_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Starts the HTTP server.
    ///
    /// Runs until `shutdown` resolves, then lets in-flight scrapes finish.
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        tracing::info!(
            addr = %self.config.bind_addr,
            path = %self.config.telemetry_path,
            "Metrics server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}

fn landing_page(telemetry_path: &str) -> String {
    format!(
        "<html>
<head><title>1-Wire Exporter</title></head>
<body>
<h1>1-Wire Exporter</h1>
<p><a href='{}'>Metrics</a></p>
</body>
</html>
",
        telemetry_path
    )
}

/// Picks the scrape timeout for one request.
///
/// The configured timeout, shortened to fit Prometheus' own timeout when
/// the request announces one.
fn scrape_timeout(headers: &HeaderMap, configured: Duration) -> Duration {
    headers
        .get(SCRAPE_TIMEOUT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|announced| !announced.is_zero())
        .map(|announced| leave_headroom(announced).min(configured))
        .unwrap_or(configured)
}

/// Takes the offset off an announced timeout, unless that would leave nothing.
fn leave_headroom(announced: Duration) -> Duration {
    if announced > SCRAPE_TIMEOUT_OFFSET {
        announced - SCRAPE_TIMEOUT_OFFSET
    } else {
        announced
    }
}

/// Handler for the landing page.
async fn landing_handler(State(state): State<AppState>) -> impl IntoResponse {
    Html(state.landing_page)
}

/// Handler for the telemetry path.
async fn metrics_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let start = Instant::now();
    tracing::debug!("Starting scrape");

    let timeout = scrape_timeout(&headers, state.scraper.config().scrape_timeout);
    let mut session = ScrapeSession::new();
    state.scraper.collect_within(&mut session, timeout).await;

    let sensors = session.sensors().len();
    let samples = session.samples().len();

    let response = match render(&state.scraper, session) {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain; charset=utf-8")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    };

    tracing::debug!(
        duration = start.elapsed().as_secs_f64(),
        sensors,
        samples,
        "Scrape done"
    );

    response
}

/// Handler for the /health endpoint.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
