//! HPE iLO Prometheus Exporter
//!
//! Republishes health, fan, temperature and power telemetry from an HPE iLO
//! management controller as Prometheus metrics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   Redfish (HTTPS)    ┌──────────────────┐
//! │    iLO      │ ◄─────────────────►  │     Exporter     │
//! │ controller  │   or hpilo_cli       │                  │
//! └─────────────┘   (local bus)        │  ┌────────────┐  │      HTTP      ┌────────────┐
//!                                      │  │ IloClient  │  │ ◄────────────► │ Prometheus │
//!                                      │  └────────────┘  │   /metrics     └────────────┘
//!                                      │  ┌────────────┐  │
//!                                      │  │   Mapper   │  │
//!                                      │  └────────────┘  │
//!                                      └──────────────────┘
//! ```
//!
//! Every scrape fetches fresh telemetry; nothing is polled in the background
//! and nothing is cached. Only the identity labels (hostname, product name,
//! serial number) are resolved once at startup.
//!
//! # Modules
//!
//! - [`ilo`] - Controller transports, response types and snapshot adapters
//! - [`telemetry`] - Canonical telemetry snapshot
//! - [`collectors`] - Metric mapper (snapshot → gauge families)
//! - [`metrics`] - Metric families and Prometheus text encoding
//! - [`server`] - HTTP server and scrape handling
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use ilo_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     config.validate()?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod ilo;
pub mod metrics;
pub mod server;
pub mod telemetry;
