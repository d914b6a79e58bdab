//! Power Collector
//!
//! # Metrics Produced
//! - `hpilo_power_reading_watts` - Present power draw
//!   - Labels: hostname, product_name, serial_number
//! - `hpilo_power_average_watts`, `hpilo_power_minimum_watts`,
//!   `hpilo_power_maximum_watts` - Statistics over the averaging window,
//!   only when the controller reports one
//!   - Labels: hostname, product_name, serial_number, interval_minutes

use super::MetricMapper;
use crate::metrics::MetricFamily;
use crate::telemetry::PowerSummary;

pub fn power_families(mapper: &MetricMapper, power: &PowerSummary) -> Vec<MetricFamily> {
    let mut reading = MetricFamily::new(
        "power_reading",
        "Power reading in Watts.",
        Some("watts"),
        mapper.label_names(&[]),
    );
    reading.push(mapper.label_values(&[]), power.present_watts);

    let mut families = vec![reading];

    if let Some(window) = &power.window {
        let interval = window.interval_minutes.to_string();
        let stats = [
            ("power_average", "Average power", window.average_watts),
            ("power_minimum", "Minimum power", window.minimum_watts),
            ("power_maximum", "Maximum power", window.maximum_watts),
        ];

        for (name, help, value) in stats {
            let mut family = MetricFamily::new(
                name,
                format!("{} in Watts over the averaging interval.", help),
                Some("watts"),
                mapper.label_names(&["interval_minutes"]),
            );
            if let Some(value) = value {
                family.push(mapper.label_values(&[interval.as_str()]), value);
            }
            families.push(family);
        }
    }

    families
}
