//! Fan Collector
//!
//! # Metrics Produced
//! - `hpilo_fan_speed_percentage` - Fan speed as reported, not clamped
//!   - Labels: hostname, product_name, serial_number, fan
//! - `hpilo_fan_health` - Fan health status (same scheme as health at a glance)
//!   - Labels: hostname, product_name, serial_number, fan

use super::{HealthCode, MetricMapper};
use crate::metrics::MetricFamily;
use crate::telemetry::FanReading;

pub fn fan_speed(mapper: &MetricMapper, fans: &[FanReading]) -> MetricFamily {
    let mut family = MetricFamily::new(
        "fan_speed",
        "Fan speed in percentage.",
        Some("percentage"),
        mapper.label_names(&["fan"]),
    );

    for fan in fans {
        family.push(mapper.label_values(&[fan.label.as_str()]), fan.speed_percent);
    }

    family
}

/// Only fans that report a status produce a sample
pub fn fan_health(mapper: &MetricMapper, fans: &[FanReading]) -> MetricFamily {
    let mut family = MetricFamily::new(
        "fan_health",
        "Fan health status, -1: Unknown, 0: OK, 1: Degraded, 2: Failed.",
        None,
        mapper.label_names(&["fan"]),
    );

    for fan in fans {
        if let Some(status) = &fan.status {
            family.push(
                mapper.label_values(&[fan.label.as_str()]),
                HealthCode::from_status(status).value(),
            );
        }
    }

    family
}
