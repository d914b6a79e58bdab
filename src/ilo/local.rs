//! Local Management-Bus Transport
//!
//! Runs `hpilo_cli` in local mode on the monitored server itself. The helper
//! talks to the controller through the host's management interface and prints
//! the classic embedded-health layout as JSON.
//!
//! The child process is killed when the returned future is dropped, so a
//! cancelled or timed-out scrape leaves nothing running.

use crate::config::IloConfig;
use crate::error::{ExporterError, Result};
use crate::ilo::types::{EmbeddedHealth, HostDataRecord};
use serde::de::DeserializeOwned;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

pub struct LocalClient {
    program: String,
    leading_args: Vec<String>,
    host: String,
}

impl LocalClient {
    pub fn new(config: &IloConfig) -> Self {
        Self {
            program: config.local_command.clone(),
            leading_args: config.local_args.clone(),
            host: config.host.clone(),
        }
    }

    /// Run one helper method and deserialize its JSON output
    async fn call<T: DeserializeOwned>(&self, method: &str) -> Result<T> {
        debug!("Running {} {} ({})", self.program, method, self.host);

        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .args(["--json", "--protocol", "local", self.host.as_str(), method])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ExporterError::LocalCommand(format!("cannot run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExporterError::LocalCommand(format!(
                "{} {} exited with {}: {}",
                self.program,
                method,
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            ExporterError::Parse(format!("{} output is not valid JSON: {}", method, e))
        })
    }

    pub async fn embedded_health(&self) -> Result<EmbeddedHealth> {
        self.call("get_embedded_health").await
    }

    pub async fn host_data(&self) -> Result<Vec<HostDataRecord>> {
        self.call("get_host_data").await
    }
}
