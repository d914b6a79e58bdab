//! iLO Controller Client
//!
//! Front door for both transports. The transport is chosen once from
//! [`Protocol`] at startup; callers only see [`ProductInfo`] and the canonical
//! [`TelemetrySnapshot`].
//!
//! # Example
//!
//! ```no_run
//! use ilo_exporter::config::IloConfig;
//! use ilo_exporter::ilo::IloClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = IloClient::new(&IloConfig::with_host("ilo.example.net"))?;
//! let product = client.product_info().await?;
//! let snapshot = client.fetch_snapshot().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::{IloConfig, Protocol};
use crate::error::{ExporterError, Result};
use crate::ilo::adapter::{self, IntoSnapshot};
use crate::ilo::local::LocalClient;
use crate::ilo::redfish::RedfishClient;
use crate::telemetry::{ProductInfo, TelemetrySnapshot};
use std::future::Future;
use std::time::Duration;

enum Transport {
    Redfish(RedfishClient),
    Local(LocalClient),
}

/// Client for one management controller
///
/// Holds no per-scrape state, so a single instance is shared by all
/// concurrent scrape handlers.
pub struct IloClient {
    transport: Transport,
    timeout: Duration,
}

impl IloClient {
    pub fn new(config: &IloConfig) -> Result<Self> {
        let transport = match config.protocol {
            Protocol::Http => Transport::Redfish(RedfishClient::new(config)?),
            Protocol::Local => Transport::Local(LocalClient::new(config)),
        };

        Ok(Self {
            transport,
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    /// Product name and serial number, fetched with a single call
    pub async fn product_info(&self) -> Result<ProductInfo> {
        self.bounded(async {
            match &self.transport {
                Transport::Redfish(client) => adapter::redfish_product(&client.system().await?),
                Transport::Local(client) => adapter::host_data_product(&client.host_data().await?),
            }
        })
        .await
    }

    /// Fetch current telemetry and reduce it to the canonical snapshot
    pub async fn fetch_snapshot(&self) -> Result<TelemetrySnapshot> {
        self.bounded(async {
            match &self.transport {
                Transport::Redfish(client) => client.telemetry().await?.into_snapshot(),
                Transport::Local(client) => client.embedded_health().await?.into_snapshot(),
            }
        })
        .await
    }

    /// Abandon `call` once the configured timeout elapses
    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ExporterError::Timeout(self.timeout.as_secs()))?
    }
}
