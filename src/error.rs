use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("iLO API error: {0}")]
    IloApi(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Timed out after {0}s waiting for the controller")]
    Timeout(u64),

    #[error("Malformed telemetry: {0}")]
    Parse(String),

    #[error("Local helper failed: {0}")]
    LocalCommand(String),

    #[error("Metrics encoding error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
