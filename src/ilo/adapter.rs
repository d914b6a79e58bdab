//! Snapshot Adapters
//!
//! Each controller layout implements [`IntoSnapshot`]. Adapters only reshape
//! data: they normalize component identifiers and skip absent hardware, but
//! leave status strings for the mapper to score.
//!
//! Hardware that is present must report its required fields. A missing or
//! non-numeric value fails the whole snapshot with [`ExporterError::Parse`];
//! only the classic "N/A" sensor reading means "no reading".
//!
//! Fans and sensors sharing a label get their source key appended
//! (`"Fan (0)"`), so every entry stays its own series.

use crate::error::{ExporterError, Result};
use crate::ilo::types::*;
use crate::telemetry::{
    ComponentHealth, FanReading, PowerSummary, PowerWindow, ProductInfo, TelemetrySnapshot,
    TemperatureReading,
};
use std::collections::HashMap;

/// Anything that can be reduced to a [`TelemetrySnapshot`]
pub trait IntoSnapshot {
    fn into_snapshot(self) -> Result<TelemetrySnapshot>;
}

impl IntoSnapshot for EmbeddedHealth {
    fn into_snapshot(self) -> Result<TelemetrySnapshot> {
        let health = self.health_at_a_glance.map(|glance| {
            glance
                .into_iter()
                .filter_map(|(component, entry)| {
                    entry
                        .status
                        .map(|status| ComponentHealth::new(snake_case(&component), status))
                })
                .collect()
        });

        let fans = self
            .fans
            .map(|fans| {
                fans.into_iter()
                    .map(|(key, fan)| {
                        let speed_percent = match fan.speed {
                            Reading::Value(value, _) => value,
                            Reading::Text(text) => parse_leading_number(&text).map_err(|_| {
                                ExporterError::Parse(format!(
                                    "fan {:?} speed {:?} is not numeric",
                                    fan.label, text
                                ))
                            })?,
                        };
                        Ok::<_, ExporterError>((
                            key,
                            FanReading {
                                label: fan.label,
                                speed_percent,
                                status: fan.status,
                            },
                        ))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(with_unique_labels)
            })
            .transpose()?;

        let temperatures = self
            .temperature
            .map(|sensors| {
                sensors
                    .into_iter()
                    .map(|(key, sensor)| {
                        let enabled = sensor
                            .status
                            .as_deref()
                            .map(|s| !is_disabled_status(s))
                            .unwrap_or(true);
                        let (reading, unit) = match sensor.currentreading {
                            Reading::Value(value, unit) => (Some(value), unit),
                            Reading::Text(text) if !enabled || is_not_available(&text) => {
                                (None, String::new())
                            }
                            Reading::Text(text) => {
                                return Err(ExporterError::Parse(format!(
                                    "sensor {:?} reading {:?} is not numeric",
                                    sensor.label, text
                                )))
                            }
                        };
                        Ok::<_, ExporterError>((
                            key,
                            TemperatureReading {
                                label: sensor.label,
                                reading,
                                unit,
                                enabled,
                            },
                        ))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(with_unique_labels)
            })
            .transpose()?;

        let power = self
            .power_supply_summary
            .map(|summary| {
                let present_watts =
                    parse_leading_number(&summary.present_power_reading).map_err(|_| {
                        ExporterError::Parse(format!(
                            "present_power_reading {:?} is not numeric",
                            summary.present_power_reading
                        ))
                    })?;
                Ok::<_, ExporterError>(PowerSummary {
                    present_watts,
                    window: None,
                })
            })
            .transpose()?;

        Ok(TelemetrySnapshot {
            health,
            fans,
            temperatures,
            power,
        })
    }
}

impl IntoSnapshot for RedfishTelemetry {
    fn into_snapshot(self) -> Result<TelemetrySnapshot> {
        let RedfishTelemetry {
            system,
            thermal,
            power,
        } = self;

        let fans = thermal
            .fans
            .map(|fans| {
                fans.iter()
                    .enumerate()
                    .filter(|(_, fan)| fan.status.is_present())
                    .map(|(index, fan)| {
                        let label = fan.label().ok_or_else(|| {
                            ExporterError::Parse(format!("fan #{} has no name", index))
                        })?;
                        let speed_percent = fan.speed().ok_or_else(|| {
                            ExporterError::Parse(format!("fan {:?} reports no reading", label))
                        })?;
                        Ok::<_, ExporterError>((
                            member_key(fan.member_id.as_deref(), index),
                            FanReading {
                                label: label.to_string(),
                                speed_percent,
                                status: fan.status.health.as_deref().map(normalize_redfish_health),
                            },
                        ))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(with_unique_labels)
            })
            .transpose()?;

        let temperatures = thermal
            .temperatures
            .map(|sensors| {
                sensors
                    .into_iter()
                    .enumerate()
                    .map(|(index, sensor)| {
                        let key = member_key(sensor.member_id.as_deref(), index);
                        let label = sensor.name.or(sensor.member_id).ok_or_else(|| {
                            ExporterError::Parse(format!("sensor #{} has no name", index))
                        })?;
                        Ok::<_, ExporterError>((
                            key,
                            TemperatureReading {
                                label,
                                reading: sensor.reading_celsius,
                                unit: "Celsius".to_string(),
                                enabled: sensor.status.is_present(),
                            },
                        ))
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(with_unique_labels)
            })
            .transpose()?;

        Ok(TelemetrySnapshot {
            health: redfish_health(&system),
            fans,
            temperatures,
            power: redfish_power(&power)?,
        })
    }
}

/// Overall health plus every OEM aggregate entry that carries a status
fn redfish_health(system: &ComputerSystem) -> Option<Vec<ComponentHealth>> {
    let overall = system
        .status
        .health_rollup
        .as_deref()
        .or(system.status.health.as_deref());

    let aggregate = system
        .oem
        .as_ref()
        .and_then(|oem| oem.hpe.as_ref())
        .and_then(|hpe| hpe.aggregate_health_status.as_ref());

    if overall.is_none() && aggregate.is_none() {
        return None;
    }

    let mut health = Vec::new();
    if let Some(status) = overall {
        health.push(ComponentHealth::new("system", normalize_redfish_health(status)));
    }
    if let Some(aggregate) = aggregate {
        for (component, value) in aggregate {
            let status = value
                .get("Status")
                .and_then(|s| s.get("Health"))
                .and_then(|h| h.as_str());
            if let Some(status) = status {
                health.push(ComponentHealth::new(
                    snake_case(component),
                    normalize_redfish_health(status),
                ));
            }
        }
    }
    Some(health)
}

fn redfish_power(power: &Power) -> Result<Option<PowerSummary>> {
    let Some(control) = power.power_control.first() else {
        return Ok(None);
    };
    let present_watts = control.power_consumed_watts.ok_or_else(|| {
        ExporterError::Parse("PowerControl[0] reports no PowerConsumedWatts".to_string())
    })?;

    let window = control.power_metrics.as_ref().and_then(|metrics| {
        Some(PowerWindow {
            interval_minutes: metrics.interval_in_min?,
            average_watts: metrics.average_consumed_watts,
            minimum_watts: metrics.min_consumed_watts,
            maximum_watts: metrics.max_consumed_watts,
        })
    });

    Ok(Some(PowerSummary {
        present_watts,
        window,
    }))
}

/// Product name and serial from the Redfish system resource
pub fn redfish_product(system: &ComputerSystem) -> Result<ProductInfo> {
    let product_name = system
        .model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ExporterError::IloApi("system resource carries no Model".to_string()))?;

    Ok(ProductInfo {
        product_name: product_name.to_string(),
        serial_number: system.serial_number.clone(),
    })
}

/// Product name and serial from the SMBIOS system record of `get_host_data`
pub fn host_data_product(records: &[HostDataRecord]) -> Result<ProductInfo> {
    records
        .iter()
        .filter(|r| r.is_system_record())
        .find_map(|r| {
            let name = r.product_name.as_deref()?.trim();
            (!name.is_empty()).then(|| ProductInfo {
                product_name: name.to_string(),
                serial_number: r.serial_number.clone(),
            })
        })
        .ok_or_else(|| {
            ExporterError::IloApi("host data carries no system record with a product name".into())
        })
}

/// Redfish reports `Critical` where the classic layout says `Failed`
fn normalize_redfish_health(status: &str) -> String {
    if status.eq_ignore_ascii_case("critical") {
        "Failed".to_string()
    } else {
        status.to_string()
    }
}

fn is_disabled_status(status: &str) -> bool {
    matches!(
        status.to_ascii_lowercase().as_str(),
        "not installed" | "disabled" | "absent"
    )
}

/// Parse the leading number of strings like "155 Watts" or "155W"
pub fn parse_leading_number(text: &str) -> Result<f64> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-')))
        .unwrap_or(text.len());

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ExporterError::Parse(format!("{:?} does not start with a number", text)))
}

/// The classic layout's marker for a sensor without a reading
fn is_not_available(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("n/a")
}

/// Stable per-entry key: Redfish `MemberId`, else the position in the table
fn member_key(member_id: Option<&str>, index: usize) -> String {
    member_id.map_or_else(|| index.to_string(), str::to_string)
}

/// Entries with a label of their own
trait Labeled {
    fn label(&self) -> &str;
    fn label_mut(&mut self) -> &mut String;
}

impl Labeled for FanReading {
    fn label(&self) -> &str {
        &self.label
    }

    fn label_mut(&mut self) -> &mut String {
        &mut self.label
    }
}

impl Labeled for TemperatureReading {
    fn label(&self) -> &str {
        &self.label
    }

    fn label_mut(&mut self) -> &mut String {
        &mut self.label
    }
}

/// Appends the source key to labels shared by more than one entry
fn with_unique_labels<T: Labeled>(keyed: Vec<(String, T)>) -> Vec<T> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for (_, item) in &keyed {
        *counts.entry(item.label().to_string()).or_default() += 1;
    }

    keyed
        .into_iter()
        .map(|(key, mut item)| {
            if counts.get(item.label()).copied().unwrap_or_default() > 1 {
                let unique = format!("{} ({})", item.label(), key);
                *item.label_mut() = unique;
            }
            item
        })
        .collect()
}

/// `PowerSupplies` → `power_supplies`, `bios_hardware` unchanged
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        }
    }
    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("PowerSupplies"), "power_supplies");
        assert_eq!(snake_case("BiosOrHardwareHealth"), "bios_or_hardware_health");
        assert_eq!(snake_case("bios_hardware"), "bios_hardware");
        assert_eq!(snake_case("Smart Storage"), "smart_storage");
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("155 Watts").unwrap(), 155.0);
        assert_eq!(parse_leading_number("  42").unwrap(), 42.0);
        assert_eq!(parse_leading_number("155W").unwrap(), 155.0);
        assert_eq!(parse_leading_number("-3.5 C").unwrap(), -3.5);
        assert!(parse_leading_number("N/A Watts").is_err());
        assert!(parse_leading_number("NaN Watts").is_err());
        assert!(parse_leading_number("inf").is_err());
        assert!(parse_leading_number("").is_err());
    }

    #[test]
    fn test_shared_labels_get_source_key() {
        let fan = |label: &str| FanReading {
            label: label.to_string(),
            speed_percent: 10.0,
            status: None,
        };
        let fans = with_unique_labels(vec![
            ("0".to_string(), fan("Fan")),
            ("1".to_string(), fan("Fan")),
            ("2".to_string(), fan("Fan 3")),
        ]);

        let labels: Vec<&str> = fans.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Fan (0)", "Fan (1)", "Fan 3"]);
    }

    #[test]
    fn test_critical_is_failed() {
        assert_eq!(normalize_redfish_health("Critical"), "Failed");
        assert_eq!(normalize_redfish_health("Warning"), "Warning");
    }
}
