//! Temperature Collector
//!
//! Sensors are grouped by their reporting unit, one family per unit, so a
//! controller mixing Celsius and Fahrenheit never puts both scales in the
//! same series.
//!
//! # Metrics Produced
//! - `hpilo_temperature_<unit>` - Temperature sensors reading
//!   - Labels: hostname, product_name, serial_number, sensor

use super::MetricMapper;
use crate::metrics::MetricFamily;
use crate::telemetry::TemperatureReading;
use std::collections::BTreeMap;

/// One family per distinct unit; non-reporting and disabled sensors are skipped
pub fn temperature_by_unit(
    mapper: &MetricMapper,
    sensors: &[TemperatureReading],
) -> Vec<MetricFamily> {
    let mut by_unit: BTreeMap<String, MetricFamily> = BTreeMap::new();

    for sensor in sensors {
        let Some(reading) = sensor.reported_value() else {
            continue;
        };

        let unit = unit_suffix(&sensor.unit);
        by_unit
            .entry(unit.clone())
            .or_insert_with(|| {
                MetricFamily::new(
                    "temperature",
                    "Temperature sensors reading.",
                    (!unit.is_empty()).then_some(unit.as_str()),
                    mapper.label_names(&["sensor"]),
                )
            })
            .push(mapper.label_values(&[sensor.label.as_str()]), reading);
    }

    by_unit.into_values().collect()
}

/// Lowercased unit restricted to metric-name characters
pub fn unit_suffix(unit: &str) -> String {
    unit.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_suffix() {
        assert_eq!(unit_suffix("Celsius"), "celsius");
        assert_eq!(unit_suffix("FAHRENHEIT"), "fahrenheit");
        assert_eq!(unit_suffix("deg C"), "deg_c");
        assert_eq!(unit_suffix(""), "");
    }
}
