//! Canonical Telemetry Model
//!
//! Every controller layout is reduced to these types before metrics are built,
//! so the metric schema never depends on which firmware or transport produced
//! the data.
//!
//! Each section of [`TelemetrySnapshot`] is optional: `None` means the
//! controller did not report it and yields no metrics, while `Some(vec![])`
//! means it reported an empty table.

/// Labels attached to every exported metric, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Target host as configured (the controller address)
    pub hostname: String,
    /// Server model, e.g. "ProLiant DL360 Gen10"
    pub product_name: String,
    pub serial_number: Option<String>,
}

impl Identity {
    pub fn new(
        hostname: impl Into<String>,
        product_name: impl Into<String>,
        serial_number: Option<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            product_name: product_name.into(),
            serial_number: serial_number.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Product details reported by the controller, before the hostname is bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub product_name: String,
    pub serial_number: Option<String>,
}

/// One fetch worth of controller telemetry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub health: Option<Vec<ComponentHealth>>,
    pub fans: Option<Vec<FanReading>>,
    pub temperatures: Option<Vec<TemperatureReading>>,
    pub power: Option<PowerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHealth {
    /// snake_case component identifier, e.g. `power_supplies`
    pub component: String,
    pub status: String,
}

impl ComponentHealth {
    pub fn new(component: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FanReading {
    pub label: String,
    /// Passed through as reported, out-of-range values included
    pub speed_percent: f64,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    pub label: String,
    /// `None` when the sensor reports "N/A"
    pub reading: Option<f64>,
    /// Opaque unit string as reported ("Celsius", "Fahrenheit", ...)
    pub unit: String,
    pub enabled: bool,
}

impl TemperatureReading {
    /// The reading to export, `None` for disabled or silent sensors
    pub fn reported_value(&self) -> Option<f64> {
        self.reading.filter(|_| self.enabled)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerSummary {
    pub present_watts: f64,
    pub window: Option<PowerWindow>,
}

/// Power statistics over the controller's averaging interval
#[derive(Debug, Clone, PartialEq)]
pub struct PowerWindow {
    pub interval_minutes: u32,
    pub average_watts: Option<f64>,
    pub minimum_watts: Option<f64>,
    pub maximum_watts: Option<f64>,
}
