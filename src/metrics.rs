//! Prometheus Metric Families and Encoding
//!
//! The mapper produces plain [`MetricFamily`] values; this module turns them
//! into Prometheus text exposition format. Every scrape encodes through its
//! own short-lived [`Registry`], so there is no process-wide metric state and
//! families whose label values disappear between scrapes vanish with them.
//!
//! All metrics are gauges and use the `hpilo_` namespace prefix.

use crate::error::{ExporterError, Result};
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashSet;

/// Namespace prefixed to every exported metric
pub const NAMESPACE: &str = "hpilo";

/// Content type of the rendered exposition
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// A gauge family with a fixed label schema
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    /// Name without namespace or unit, e.g. `fan_speed`
    pub name: String,
    pub help: String,
    /// Unit suffix, e.g. `percentage` or `celsius`
    pub unit: Option<String>,
    pub label_names: Vec<String>,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Values in the same order as [`MetricFamily::label_names`]
    pub label_values: Vec<String>,
    pub value: f64,
}

impl MetricFamily {
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        unit: Option<&str>,
        label_names: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            unit: unit.map(str::to_string),
            label_names,
            samples: Vec::new(),
        }
    }

    pub fn push(&mut self, label_values: Vec<String>, value: f64) {
        self.samples.push(Sample {
            label_values,
            value,
        });
    }

    /// Name without namespace, unit suffix included
    pub fn metric_name(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{}_{}", self.name, unit),
            None => self.name.clone(),
        }
    }

    /// Fully qualified name as it appears on the wire
    pub fn full_name(&self) -> String {
        format!("{}_{}", NAMESPACE, self.metric_name())
    }
}

/// Render families in Prometheus text format
///
/// Families without samples are omitted. Output is sorted by family name and
/// label values, so identical input renders byte-identically. Two samples
/// with the same label values in one family are rejected rather than merged.
pub fn render(families: &[MetricFamily]) -> Result<String> {
    let registry = Registry::new();

    for family in families.iter().filter(|f| !f.samples.is_empty()) {
        let label_names: Vec<&str> = family.label_names.iter().map(String::as_str).collect();
        let gauge = GaugeVec::new(
            Opts::new(family.metric_name(), family.help.clone()).namespace(NAMESPACE),
            &label_names,
        )?;

        let mut seen = HashSet::new();
        for sample in &family.samples {
            if !seen.insert(&sample.label_values) {
                return Err(ExporterError::Parse(format!(
                    "{} has two samples labeled {:?}",
                    family.full_name(),
                    sample.label_values
                )));
            }
            let values: Vec<&str> = sample.label_values.iter().map(String::as_str).collect();
            gauge.get_metric_with_label_values(&values)?.set(sample.value);
        }

        registry.register(Box::new(gauge))?;
    }

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| ExporterError::Parse(format!("non UTF-8 exposition: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_name_appends_unit() {
        let family = MetricFamily::new("fan_speed", "Fan speed", Some("percentage"), vec![]);
        assert_eq!(family.metric_name(), "fan_speed_percentage");
        assert_eq!(family.full_name(), "hpilo_fan_speed_percentage");
    }

    #[test]
    fn test_render_rejects_duplicate_series() {
        let mut family =
            MetricFamily::new("fan_speed", "Fan speed", Some("percentage"), vec!["fan".into()]);
        family.push(vec!["Fan".into()], 10.0);
        family.push(vec!["Fan".into()], 20.0);

        assert!(matches!(render(&[family]), Err(ExporterError::Parse(_))));
    }

    #[test]
    fn test_render_skips_empty_families() {
        let empty = MetricFamily::new("fan_speed", "Fan speed", Some("percentage"), vec![]);
        let rendered = render(&[empty]).unwrap();
        assert!(rendered.is_empty());
    }
}
