//! Health-at-a-Glance Collector
//!
//! # Metrics Produced
//! - `hpilo_health_at_a_glance` - Component health status
//!   - Labels: hostname, product_name, serial_number, component

use super::MetricMapper;
use crate::metrics::MetricFamily;
use crate::telemetry::ComponentHealth;

/// Numeric health scheme shared by every health family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCode {
    Unknown = -1,
    Ok = 0,
    Degraded = 1,
    Failed = 2,
}

impl HealthCode {
    /// Case-insensitive status lookup; unrecognized text is `Unknown`
    pub fn from_status(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "ok" => HealthCode::Ok,
            "degraded" | "warning" => HealthCode::Degraded,
            "failed" => HealthCode::Failed,
            _ => HealthCode::Unknown,
        }
    }

    pub fn value(self) -> f64 {
        f64::from(self as i8)
    }
}

pub const HEALTH_HELP: &str =
    "iLO health at a glance status, -1: Unknown, 0: OK, 1: Degraded, 2: Failed.";

pub fn health_at_a_glance(mapper: &MetricMapper, components: &[ComponentHealth]) -> MetricFamily {
    let mut family = MetricFamily::new(
        "health_at_a_glance",
        HEALTH_HELP,
        None,
        mapper.label_names(&["component"]),
    );

    for entry in components {
        family.push(
            mapper.label_values(&[entry.component.as_str()]),
            HealthCode::from_status(&entry.status).value(),
        );
    }

    family
}
