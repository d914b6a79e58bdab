//! Redfish REST Transport
//!
//! Reads the controller's Redfish resources over HTTP(S) with basic
//! authentication. Every request is independent: iLO accepts basic auth on
//! each call, so no session has to be created, kept alive or cleaned up.

use crate::config::IloConfig;
use crate::error::{ExporterError, Result};
use crate::ilo::types::{ComputerSystem, Power, RedfishTelemetry, Thermal};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const SYSTEM_PATH: &str = "/redfish/v1/Systems/1/";
pub const THERMAL_PATH: &str = "/redfish/v1/Chassis/1/Thermal/";
pub const POWER_PATH: &str = "/redfish/v1/Chassis/1/Power/";

pub struct RedfishClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    password: SecretString,
}

impl RedfishClient {
    pub fn new(config: &IloConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("ilo-exporter/", env!("CARGO_PKG_VERSION")));

        if config.use_tls && !config.verify_ssl {
            // Controllers ship with self-signed certificates
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|e| ExporterError::Config(e.to_string()))?;
            builder = builder.use_preconfigured_tls(connector);
        }

        let http = builder
            .build()
            .map_err(|e| ExporterError::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url(config),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// GET a Redfish resource and deserialize it
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.user, Some(self.password.expose_secret()))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ExporterError::Auth(format!(
                    "{} rejected credentials for user {:?} ({})",
                    path,
                    self.user,
                    response.status()
                )));
            }
            status => {
                return Err(ExporterError::IloApi(format!(
                    "GET {} returned {}",
                    path, status
                )));
            }
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            ExporterError::Parse(format!("{} returned malformed JSON: {}", path, e))
        })
    }

    pub async fn system(&self) -> Result<ComputerSystem> {
        self.get(SYSTEM_PATH).await
    }

    /// Fetch system, thermal and power resources concurrently
    pub async fn telemetry(&self) -> Result<RedfishTelemetry> {
        let (system, thermal, power) = futures_util::future::try_join3(
            self.get::<ComputerSystem>(SYSTEM_PATH),
            self.get::<Thermal>(THERMAL_PATH),
            self.get::<Power>(POWER_PATH),
        )
        .await?;

        Ok(RedfishTelemetry {
            system,
            thermal,
            power,
        })
    }
}

fn base_url(config: &IloConfig) -> String {
    let scheme = if config.use_tls { "https" } else { "http" };
    let host = config.host.trim();
    // Bracket bare IPv6 literals
    if host.contains(':') && !host.starts_with('[') {
        format!("{}://[{}]:{}", scheme, host, config.port)
    } else {
        format!("{}://{}:{}", scheme, host, config.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_uses_scheme_and_port() {
        let mut config = IloConfig::with_host("ilo.example.net");
        assert_eq!(base_url(&config), "https://ilo.example.net:443");

        config.use_tls = false;
        config.port = 8080;
        assert_eq!(base_url(&config), "http://ilo.example.net:8080");
    }

    #[test]
    fn test_base_url_brackets_ipv6() {
        let config = IloConfig::with_host("fe80::1");
        assert_eq!(base_url(&config), "https://[fe80::1]:443");
    }
}
