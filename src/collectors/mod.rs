//! Metric Mapper
//!
//! Turns a [`TelemetrySnapshot`] into gauge families. Each telemetry section
//! has its own collector module; [`MetricMapper::map`] runs them in a fixed
//! order.
//!
//! # Schema
//!
//! Every family carries the identity labels `hostname`, `product_name` and
//! `serial_number`, followed by one section-specific label:
//!
//! | Family | Extra label |
//! |---|---|
//! | `hpilo_health_at_a_glance` | `component` |
//! | `hpilo_fan_health` | `fan` |
//! | `hpilo_fan_speed_percentage` | `fan` |
//! | `hpilo_temperature_<unit>` | `sensor` |
//! | `hpilo_power_reading_watts` | none |
//! | `hpilo_power_{average,minimum,maximum}_watts` | `interval_minutes` |
//!
//! Health values use [`HealthCode`]: -1 unknown, 0 ok, 1 degraded, 2 failed.
//!
//! # Missing data
//!
//! An absent section yields no samples. Mapping never fails: values that
//! cannot be parsed are rejected earlier, when the snapshot is built.

use crate::metrics::MetricFamily;
use crate::telemetry::{Identity, TelemetrySnapshot};

pub mod fan;
pub mod health;
pub mod power;
pub mod temperature;

pub use health::HealthCode;

/// Identity label names, in the order they appear on every family
pub const IDENTITY_LABELS: [&str; 3] = ["hostname", "product_name", "serial_number"];

/// Stateless mapper bound to the exporter's identity
#[derive(Debug, Clone)]
pub struct MetricMapper {
    identity: Identity,
}

impl MetricMapper {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Map one snapshot to metric families
    pub fn map(&self, snapshot: &TelemetrySnapshot) -> Vec<MetricFamily> {
        let mut families = Vec::new();

        if let Some(components) = &snapshot.health {
            families.push(health::health_at_a_glance(self, components));
        }
        if let Some(fans) = &snapshot.fans {
            families.push(fan::fan_speed(self, fans));
            families.push(fan::fan_health(self, fans));
        }
        if let Some(sensors) = &snapshot.temperatures {
            families.extend(temperature::temperature_by_unit(self, sensors));
        }
        if let Some(power) = &snapshot.power {
            families.extend(power::power_families(self, power));
        }

        families
    }

    /// Identity labels followed by `extra`
    pub(crate) fn label_names(&self, extra: &[&str]) -> Vec<String> {
        IDENTITY_LABELS
            .iter()
            .chain(extra)
            .map(|s| s.to_string())
            .collect()
    }

    /// Identity label values followed by `extra`
    pub(crate) fn label_values(&self, extra: &[&str]) -> Vec<String> {
        let mut values = Vec::with_capacity(IDENTITY_LABELS.len() + extra.len());
        values.push(self.identity.hostname.clone());
        values.push(self.identity.product_name.clone());
        values.push(self.identity.serial_number.clone().unwrap_or_default());
        values.extend(extra.iter().map(|s| s.to_string()));
        values
    }
}
