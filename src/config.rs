use crate::error::ExporterError;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_USER: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub ilo: IloConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IloConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_ilo_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: SecretString,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default = "default_true")]
    pub use_tls: bool,
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_local_command")]
    pub local_command: String,
    #[serde(default)]
    pub local_args: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// How the exporter talks to the management controller
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String")]
pub enum Protocol {
    /// Redfish REST API over the network
    #[default]
    Http,
    /// `hpilo_cli` over the host's management bus
    Local,
}

impl FromStr for Protocol {
    type Err = ExporterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HTTP" => Ok(Protocol::Http),
            "LOCAL" => Ok(Protocol::Local),
            _ => Err(ExporterError::Config(format!(
                "unsupported protocol {:?} (expected HTTP or LOCAL)",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Protocol {
    type Error = ExporterError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => f.write_str("HTTP"),
            Protocol::Local => f.write_str("LOCAL"),
        }
    }
}

fn default_ilo_port() -> u16 {
    443
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

fn default_password() -> SecretString {
    SecretString::from(DEFAULT_PASSWORD)
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    10
}

fn default_local_command() -> String {
    "hpilo_cli".to_string()
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9116
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl Default for IloConfig {
    fn default() -> Self {
        Self::with_host(String::new())
    }
}

impl IloConfig {
    /// Settings for `host` with every other field at its default
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_ilo_port(),
            user: default_user(),
            password: default_password(),
            protocol: Protocol::default(),
            use_tls: true,
            verify_ssl: true,
            timeout_seconds: default_timeout(),
            local_command: default_local_command(),
            local_args: Vec::new(),
        }
    }

    /// True when the stock factory credentials are still in use
    pub fn uses_default_credentials(&self) -> bool {
        self.user == DEFAULT_USER && self.password.expose_secret() == DEFAULT_PASSWORD
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("ILO_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Rejects settings the exporter cannot start with
    pub fn validate(&self) -> std::result::Result<(), ExporterError> {
        if self.ilo.host.trim().is_empty() {
            return Err(ExporterError::Config("ILO_HOST not set".to_string()));
        }
        if self.ilo.timeout_seconds == 0 {
            return Err(ExporterError::Config(
                "ilo.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.ilo.protocol == Protocol::Local && self.ilo.local_command.trim().is_empty() {
            return Err(ExporterError::Config(
                "ilo.local_command must name the helper program for LOCAL protocol".to_string(),
            ));
        }
        Ok(())
    }
}
