//! Translation of the Chronos metrics payload into Prometheus metric families
//!
//! The set of exported metrics is fixed by [`CATALOG`]. Each catalog series
//! reads one field of the payload. A series whose field is missing or not
//! numeric is left out of the current scrape; a family left without any
//! series is dropped. Nothing else in the payload is exported.

use prometheus::{
    core::{Collector, Desc},
    proto::MetricFamily,
    Counter, CounterVec, Gauge, GaugeVec, Opts,
};
use std::collections::HashMap;

use crate::{
    error::AppError,
    models::chronos::{MetricsPayload, Source},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

/// One exported time series and the payload field it is read from
#[derive(Debug)]
pub struct Series {
    /// Value of the family label; empty for unlabeled families
    pub label_value: &'static str,
    pub source: Source,
    /// The raw value is divided by this (unit conversion)
    pub divisor: f64,
}

/// A pre-declared metric family
#[derive(Debug)]
pub struct FamilySpec {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub label: Option<&'static str>,
    pub series: &'static [Series],
}

/// A single value read from the payload for the current scrape
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub family: &'static str,
    pub kind: MetricKind,
    pub label: Option<(&'static str, &'static str)>,
    pub value: f64,
}

const fn plain(source: Source) -> Series {
    Series {
        label_value: "",
        source,
        divisor: 1.0,
    }
}

const fn labeled(label_value: &'static str, source: Source) -> Series {
    Series {
        label_value,
        source,
        divisor: 1.0,
    }
}

const MILLIS_PER_SECOND: f64 = 1000.0;

pub static CATALOG: &[FamilySpec] = &[
    FamilySpec {
        name: "chronos_jvm_memory_heap_used_bytes",
        help: "Heap memory used by the Chronos JVM",
        kind: MetricKind::Gauge,
        label: None,
        series: &[plain(Source::Gauge("jvm.memory.heap.used"))],
    },
    FamilySpec {
        name: "chronos_jvm_memory_heap_committed_bytes",
        help: "Heap memory committed by the Chronos JVM",
        kind: MetricKind::Gauge,
        label: None,
        series: &[plain(Source::Gauge("jvm.memory.heap.committed"))],
    },
    FamilySpec {
        name: "chronos_jvm_memory_heap_max_bytes",
        help: "Maximum heap memory available to the Chronos JVM",
        kind: MetricKind::Gauge,
        label: None,
        series: &[plain(Source::Gauge("jvm.memory.heap.max"))],
    },
    FamilySpec {
        name: "chronos_jvm_memory_non_heap_used_bytes",
        help: "Non-heap memory used by the Chronos JVM",
        kind: MetricKind::Gauge,
        label: None,
        series: &[plain(Source::Gauge("jvm.memory.non-heap.used"))],
    },
    FamilySpec {
        name: "chronos_jvm_threads",
        help: "Chronos JVM threads by state",
        kind: MetricKind::Gauge,
        label: Some("state"),
        series: &[
            labeled("new", Source::Gauge("jvm.threads.new.count")),
            labeled("runnable", Source::Gauge("jvm.threads.runnable.count")),
            labeled("blocked", Source::Gauge("jvm.threads.blocked.count")),
            labeled("waiting", Source::Gauge("jvm.threads.waiting.count")),
            labeled("timed_waiting", Source::Gauge("jvm.threads.timed_waiting.count")),
            labeled("terminated", Source::Gauge("jvm.threads.terminated.count")),
        ],
    },
    FamilySpec {
        name: "chronos_jvm_threads_daemon",
        help: "Chronos JVM daemon threads",
        kind: MetricKind::Gauge,
        label: None,
        series: &[plain(Source::Gauge("jvm.threads.daemon.count"))],
    },
    FamilySpec {
        name: "chronos_jvm_threads_deadlocked",
        help: "Chronos JVM deadlocked threads",
        kind: MetricKind::Gauge,
        label: None,
        series: &[plain(Source::Gauge("jvm.threads.deadlock.count"))],
    },
    FamilySpec {
        name: "chronos_jvm_gc_collections_total",
        help: "Garbage collections run by the Chronos JVM",
        kind: MetricKind::Counter,
        label: Some("collector"),
        series: &[
            labeled("PS-MarkSweep", Source::Gauge("jvm.gc.PS-MarkSweep.count")),
            labeled("PS-Scavenge", Source::Gauge("jvm.gc.PS-Scavenge.count")),
        ],
    },
    FamilySpec {
        name: "chronos_jvm_gc_collection_seconds_total",
        help: "Time spent in garbage collection by the Chronos JVM",
        kind: MetricKind::Counter,
        label: Some("collector"),
        series: &[
            Series {
                label_value: "PS-MarkSweep",
                source: Source::Gauge("jvm.gc.PS-MarkSweep.time"),
                divisor: MILLIS_PER_SECOND,
            },
            Series {
                label_value: "PS-Scavenge",
                source: Source::Gauge("jvm.gc.PS-Scavenge.time"),
                divisor: MILLIS_PER_SECOND,
            },
        ],
    },
    FamilySpec {
        name: "chronos_http_requests_total",
        help: "HTTP requests handled by the Chronos API",
        kind: MetricKind::Counter,
        label: None,
        series: &[plain(Source::Timer(
            "org.eclipse.jetty.servlet.ServletContextHandler.requests",
        ))],
    },
    FamilySpec {
        name: "chronos_http_active_requests",
        help: "HTTP requests currently in flight in the Chronos API",
        kind: MetricKind::Gauge,
        label: None,
        series: &[plain(Source::Counter(
            "org.eclipse.jetty.servlet.ServletContextHandler.active-requests",
        ))],
    },
    FamilySpec {
        name: "chronos_http_responses_total",
        help: "HTTP responses sent by the Chronos API by status class",
        kind: MetricKind::Counter,
        label: Some("code"),
        series: &[
            labeled("1xx", Source::Meter("org.eclipse.jetty.servlet.ServletContextHandler.1xx-responses")),
            labeled("2xx", Source::Meter("org.eclipse.jetty.servlet.ServletContextHandler.2xx-responses")),
            labeled("3xx", Source::Meter("org.eclipse.jetty.servlet.ServletContextHandler.3xx-responses")),
            labeled("4xx", Source::Meter("org.eclipse.jetty.servlet.ServletContextHandler.4xx-responses")),
            labeled("5xx", Source::Meter("org.eclipse.jetty.servlet.ServletContextHandler.5xx-responses")),
        ],
    },
];

/// Number of series the catalog can produce from a complete payload
pub fn series_count() -> usize {
    CATALOG.iter().map(|family| family.series.len()).sum()
}

/// Descriptors for every catalog family, in catalog order
pub fn describe_catalog() -> Result<Vec<Desc>, AppError> {
    CATALOG
        .iter()
        .map(|family| {
            let variable_labels = family.label.map(|l| vec![l.to_string()]).unwrap_or_default();
            Desc::new(
                family.name.to_string(),
                family.help.to_string(),
                variable_labels,
                HashMap::new(),
            )
            .map_err(AppError::from)
        })
        .collect()
}

/// Read every catalog series present in the payload
pub fn extract_records(payload: &MetricsPayload) -> Vec<MetricRecord> {
    let mut records = Vec::with_capacity(series_count());

    for family in CATALOG {
        for series in family.series {
            let Some(raw) = payload.lookup(series.source) else {
                tracing::debug!(metric = family.name, source = ?series.source, "Field missing from Chronos payload");
                continue;
            };

            let value = raw / series.divisor;
            if family.kind == MetricKind::Counter && value < 0.0 {
                tracing::debug!(metric = family.name, value, "Skipping negative counter value");
                continue;
            }

            records.push(MetricRecord {
                family: family.name,
                kind: family.kind,
                label: family.label.map(|name| (name, series.label_value)),
                value,
            });
        }
    }

    records
}

/// Turn the records of one scrape into Prometheus metric families
pub fn to_metric_families(records: &[MetricRecord]) -> Result<Vec<MetricFamily>, AppError> {
    let mut families = Vec::new();

    for spec in CATALOG {
        let members: Vec<&MetricRecord> = records.iter().filter(|r| r.family == spec.name).collect();
        if members.is_empty() {
            continue;
        }
        families.extend(build_family(spec, &members)?);
    }

    Ok(families)
}

/// Full translation of a parsed payload
pub fn convert(payload: &MetricsPayload) -> Result<Vec<MetricFamily>, AppError> {
    to_metric_families(&extract_records(payload))
}

fn build_family(spec: &FamilySpec, records: &[&MetricRecord]) -> Result<Vec<MetricFamily>, AppError> {
    let opts = Opts::new(spec.name, spec.help);

    let families = match (spec.kind, spec.label) {
        (MetricKind::Gauge, None) => {
            let gauge = Gauge::with_opts(opts)?;
            for record in records {
                gauge.set(record.value);
            }
            gauge.collect()
        }
        (MetricKind::Gauge, Some(label)) => {
            let vec = GaugeVec::new(opts, &[label])?;
            for record in records {
                vec.with_label_values(&[label_value(record)]).set(record.value);
            }
            vec.collect()
        }
        (MetricKind::Counter, None) => {
            let counter = Counter::with_opts(opts)?;
            for record in records {
                counter.inc_by(record.value);
            }
            counter.collect()
        }
        (MetricKind::Counter, Some(label)) => {
            let vec = CounterVec::new(opts, &[label])?;
            for record in records {
                vec.with_label_values(&[label_value(record)]).inc_by(record.value);
            }
            vec.collect()
        }
    };

    Ok(families)
}

fn label_value(record: &MetricRecord) -> &'static str {
    record.label.map(|(_, value)| value).unwrap_or_default()
}
