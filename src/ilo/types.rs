//! iLO Response Type Definitions
//!
//! Serde definitions for the two response layouts the exporter understands.
//!
//! # Redfish layout (`HTTP` protocol)
//!
//! - `/redfish/v1/Systems/1/` → [`ComputerSystem`]
//! - `/redfish/v1/Chassis/1/Thermal/` → [`Thermal`]
//! - `/redfish/v1/Chassis/1/Power/` → [`Power`]
//!
//! iLO 4 firmware predates some Redfish spellings (`FanName`,
//! `CurrentReading`, `Oem.Hp`); both spellings are read.
//!
//! # Classic embedded-health layout (`LOCAL` protocol)
//!
//! JSON printed by `hpilo_cli --json`:
//!
//! - `get_embedded_health` → [`EmbeddedHealth`]
//! - `get_host_data` → `Vec<`[`HostDataRecord`]`>`
//!
//! Readings in this layout are `[value, unit]` pairs, or the text `"N/A"` for
//! sensors that report nothing.

use serde::Deserialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Redfish
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ResourceStatus {
    #[serde(rename = "Health", default)]
    pub health: Option<String>,
    #[serde(rename = "HealthRollup", default)]
    pub health_rollup: Option<String>,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
}

impl ResourceStatus {
    /// Absent or disabled resources carry no meaningful reading
    pub fn is_present(&self) -> bool {
        !matches!(self.state.as_deref(), Some("Absent") | Some("Disabled"))
    }
}

/// `/redfish/v1/Systems/1/`
#[derive(Debug, Deserialize, Clone)]
pub struct ComputerSystem {
    #[serde(rename = "Model", default)]
    pub model: Option<String>,
    #[serde(rename = "SerialNumber", default)]
    pub serial_number: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: ResourceStatus,
    #[serde(rename = "Oem", default)]
    pub oem: Option<SystemOem>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SystemOem {
    #[serde(rename = "Hpe", alias = "Hp", default)]
    pub hpe: Option<HpeSystemOem>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HpeSystemOem {
    /// Health-at-a-glance: component name → `{ "Status": { "Health": ... } }`
    /// or a bare string for redundancy/agent entries
    #[serde(rename = "AggregateHealthStatus", default)]
    pub aggregate_health_status: Option<BTreeMap<String, serde_json::Value>>,
}

/// `/redfish/v1/Chassis/1/Thermal/`
#[derive(Debug, Deserialize, Clone)]
pub struct Thermal {
    #[serde(rename = "Fans", default)]
    pub fans: Option<Vec<RedfishFan>>,
    #[serde(rename = "Temperatures", default)]
    pub temperatures: Option<Vec<RedfishTemperature>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedfishFan {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "FanName", default)]
    pub fan_name: Option<String>,
    #[serde(rename = "MemberId", default)]
    pub member_id: Option<String>,
    #[serde(rename = "Reading", default)]
    pub reading: Option<f64>,
    #[serde(rename = "CurrentReading", default)]
    pub current_reading: Option<f64>,
    #[serde(rename = "Status", default)]
    pub status: ResourceStatus,
}

impl RedfishFan {
    /// Display label; iLO 4 only fills `FanName`
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.fan_name.as_deref())
            .or(self.member_id.as_deref())
    }

    pub fn speed(&self) -> Option<f64> {
        self.reading.or(self.current_reading)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedfishTemperature {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "MemberId", default)]
    pub member_id: Option<String>,
    #[serde(rename = "ReadingCelsius", default)]
    pub reading_celsius: Option<f64>,
    #[serde(rename = "Status", default)]
    pub status: ResourceStatus,
}

/// `/redfish/v1/Chassis/1/Power/`
#[derive(Debug, Deserialize, Clone)]
pub struct Power {
    #[serde(rename = "PowerControl", default)]
    pub power_control: Vec<PowerControl>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PowerControl {
    #[serde(rename = "PowerConsumedWatts", default)]
    pub power_consumed_watts: Option<f64>,
    #[serde(rename = "PowerMetrics", alias = "PowerMetric", default)]
    pub power_metrics: Option<PowerMetrics>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PowerMetrics {
    #[serde(rename = "IntervalInMin", default)]
    pub interval_in_min: Option<u32>,
    #[serde(rename = "AverageConsumedWatts", default)]
    pub average_consumed_watts: Option<f64>,
    #[serde(rename = "MinConsumedWatts", default)]
    pub min_consumed_watts: Option<f64>,
    #[serde(rename = "MaxConsumedWatts", default)]
    pub max_consumed_watts: Option<f64>,
}

/// The three Redfish documents read on every scrape
#[derive(Debug, Clone)]
pub struct RedfishTelemetry {
    pub system: ComputerSystem,
    pub thermal: Thermal,
    pub power: Power,
}

// ---------------------------------------------------------------------------
// Classic embedded health
// ---------------------------------------------------------------------------

/// `get_embedded_health` result. Sections are `null` on firmware that does not
/// report them.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EmbeddedHealth {
    #[serde(default)]
    pub health_at_a_glance: Option<BTreeMap<String, GlanceEntry>>,
    #[serde(default)]
    pub fans: Option<BTreeMap<String, ClassicFan>>,
    #[serde(default)]
    pub temperature: Option<BTreeMap<String, ClassicTemperature>>,
    #[serde(default)]
    pub power_supply_summary: Option<PowerSupplySummary>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlanceEntry {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassicFan {
    pub label: String,
    /// `[23, "Percentage"]`
    pub speed: Reading,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassicTemperature {
    pub label: String,
    pub currentreading: Reading,
    #[serde(default)]
    pub status: Option<String>,
}

/// A `[value, unit]` pair, or free text such as "N/A"
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Reading {
    Value(f64, String),
    Text(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct PowerSupplySummary {
    /// e.g. "155 Watts"
    pub present_power_reading: String,
}

/// One SMBIOS record from `get_host_data`
#[derive(Debug, Deserialize, Clone)]
pub struct HostDataRecord {
    #[serde(rename = "type")]
    pub record_type: serde_json::Value,
    #[serde(rename = "Product Name", default)]
    pub product_name: Option<String>,
    #[serde(rename = "Serial Number", default)]
    pub serial_number: Option<String>,
}

impl HostDataRecord {
    /// SMBIOS type 1 is the system information record
    pub fn is_system_record(&self) -> bool {
        match &self.record_type {
            serde_json::Value::Number(n) => n.as_u64() == Some(1),
            serde_json::Value::String(s) => s.trim() == "1",
            _ => false,
        }
    }
}
