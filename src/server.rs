//! HTTP Server and Scrape Handling
//!
//! # Architecture
//!
//! - **Startup**: resolve the controller identity once; failure aborts before
//!   the listening socket is bound
//! - **HTTP Server**: Axum-based server exposing `/metrics`, `/health`, and `/`
//! - **Scrape**: every `/metrics` request fetches fresh telemetry, maps it and
//!   encodes it. Nothing is cached between requests.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with a link to metrics
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - Liveness check (200 once the exporter is serving)
//!
//! # Error Handling
//!
//! A failed fetch (unreachable controller, rejected credentials, timeout,
//! malformed telemetry) fails only that scrape with `503 Service Unavailable`.
//! Encoding failures return `500 Internal Server Error`. The process keeps
//! serving either way and never retries on its own.

use crate::collectors::MetricMapper;
use crate::config::{Config, IloConfig, Protocol};
use crate::error::{ExporterError, Result};
use crate::ilo::IloClient;
use crate::metrics::{self, CONTENT_TYPE};
use crate::telemetry::Identity;
use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Shared, read-only state of the scrape handlers
#[derive(Clone)]
pub struct AppState {
    client: Arc<IloClient>,
    mapper: Arc<MetricMapper>,
}

impl AppState {
    pub fn new(client: IloClient, identity: Identity) -> Self {
        Self {
            client: Arc::new(client),
            mapper: Arc::new(MetricMapper::new(identity)),
        }
    }

    pub fn identity(&self) -> &Identity {
        self.mapper.identity()
    }

    /// One fetch → map → encode cycle
    pub async fn scrape(&self) -> Result<String> {
        let snapshot = self.client.fetch_snapshot().await?;
        let families = self.mapper.map(&snapshot);
        metrics::render(&families)
    }
}

/// Connect to the controller and resolve the identity labels
///
/// Called once at startup; any error here is fatal.
pub async fn resolve_identity(config: &IloConfig) -> anyhow::Result<(IloClient, Identity)> {
    let client = IloClient::new(config)
        .with_context(|| format!("Failed to set up {} client for {}", config.protocol, config.host))?;

    let product = client
        .product_info()
        .await
        .with_context(|| format!("Failed to resolve identity of {}", config.host))?;

    let identity = Identity::new(config.host.clone(), product.product_name, product.serial_number);
    info!(
        "Monitoring {} ({}, serial {})",
        identity.hostname,
        identity.product_name,
        identity.serial_number.as_deref().unwrap_or("unknown")
    );

    Ok((client, identity))
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    if config.ilo.uses_default_credentials() && config.ilo.protocol == Protocol::Http {
        warn!("Using the default iLO credentials admin/password; set ILO_USER and ILO_PASSWORD");
    }
    if config.ilo.use_tls && !config.ilo.verify_ssl {
        warn!("TLS certificate verification is disabled for {}", config.ilo.host);
    }

    let (client, identity) = resolve_identity(&config.ilo).await?;
    let app = router(AppState::new(client, identity));

    // Start the server
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn root_handler() -> Html<&'static str> {
    Html(
        r#"<html>
<head><title>iLO Exporter</title></head>
<body>
<h1>iLO Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let target = &state.identity().hostname;

    match state.scrape().await {
        Ok(body) => {
            debug!(
                "Scraped {} in {:.3}s",
                target,
                started.elapsed().as_secs_f64()
            );
            ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
        }
        Err(e @ ExporterError::Metrics(_)) => {
            error!("Failed to render metrics for {}: {}", target, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
        Err(e) => {
            error!("Scrape of {} failed: {}", target, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Scrape of {} failed: {}", target, e),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
