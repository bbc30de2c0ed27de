//! Chronos `/metrics` payload
//!
//! Chronos serves its Dropwizard metric registry as JSON. Only the sections
//! the exporter reads are modelled; anything else in the document is ignored.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Top-level Dropwizard metrics document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsPayload {
    /// Registry format version, e.g. "3.0.0"
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub gauges: HashMap<String, GaugeEntry>,
    #[serde(default)]
    pub counters: HashMap<String, CountEntry>,
    #[serde(default)]
    pub meters: HashMap<String, CountEntry>,
    #[serde(default)]
    pub timers: HashMap<String, CountEntry>,
}

/// A gauge; Dropwizard gauges may hold any JSON value, not only numbers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GaugeEntry {
    #[serde(default)]
    pub value: Value,
}

/// Counters, meters and timers all carry a `count` field
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountEntry {
    #[serde(default)]
    pub count: Value,
}

/// Where a metric value lives in the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `gauges[key].value`
    Gauge(&'static str),
    /// `counters[key].count`
    Counter(&'static str),
    /// `meters[key].count`
    Meter(&'static str),
    /// `timers[key].count`
    Timer(&'static str),
}

impl MetricsPayload {
    /// Parse a raw response body
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Look up a numeric value; `None` when the entry is missing or not a finite number
    pub fn lookup(&self, source: Source) -> Option<f64> {
        let value = match source {
            Source::Gauge(key) => &self.gauges.get(key)?.value,
            Source::Counter(key) => &self.counters.get(key)?.count,
            Source::Meter(key) => &self.meters.get(key)?.count,
            Source::Timer(key) => &self.timers.get(key)?.count,
        };

        value.as_f64().filter(|v| v.is_finite())
    }
}
