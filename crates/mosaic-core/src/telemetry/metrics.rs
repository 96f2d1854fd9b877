// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Metric identifiers, values and errors.
//!
//! The registry that stores them lives in `mosaic-telemetry`; this module only
//! fixes the vocabulary so lower crates can describe metrics without depending
//! on it.

use std::fmt::{self, Display};
use std::time::Instant;
use thiserror::Error;

/// A structured identifier for a metric: `namespace:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId {
    /// The broad category of the metric (e.g., "assets", "sequencer").
    pub namespace: String,
    /// The specific name of the metric (e.g., "loaded_total").
    pub name: String,
}

impl MetricId {
    /// Creates a new `MetricId` with a namespace and a name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// The fundamental type of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Only ever increases.
    Counter,
    /// Goes up or down.
    Gauge,
    /// Distribution of observed samples.
    Histogram,
}

/// The current value of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// A monotonically increasing count.
    Counter(u64),
    /// An instantaneous reading.
    Gauge(f64),
    /// Bucketed samples.
    Histogram {
        /// Upper bounds of each bucket, ascending.
        bucket_bounds: Vec<f64>,
        /// Number of samples at or below each bound.
        bucket_counts: Vec<u64>,
        /// Number of samples observed.
        count: u64,
        /// Sum of all samples.
        sum: f64,
    },
}

impl MetricValue {
    /// Returns the [`MetricKind`] corresponding to this value.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Counter(_) => MetricKind::Counter,
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Histogram { .. } => MetricKind::Histogram,
        }
    }

    /// Returns the value as a `u64` if it is a `Counter`.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an `f64` if it is a `Gauge`.
    pub fn as_gauge(&self) -> Option<f64> {
        match self {
            MetricValue::Gauge(v) => Some(*v),
            _ => None,
        }
    }

    /// Mean of a histogram's samples, `None` for other kinds or when empty.
    pub fn histogram_mean(&self) -> Option<f64> {
        match self {
            MetricValue::Histogram { count, sum, .. } if *count > 0 => Some(sum / *count as f64),
            _ => None,
        }
    }
}

/// A metric with its description.
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric's identifier.
    pub id: MetricId,
    /// A human-readable description.
    pub description: String,
    /// Unit of measurement (e.g., "ms", "count").
    pub unit: String,
    /// Current value.
    pub value: MetricValue,
    /// When the value last changed.
    pub last_updated: Instant,
}

impl Metric {
    /// A zeroed counter.
    pub fn counter(id: MetricId, description: impl Into<String>) -> Self {
        Self::with_value(id, description, "count", MetricValue::Counter(0))
    }

    /// A zeroed gauge.
    pub fn gauge(id: MetricId, description: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::with_value(id, description, unit, MetricValue::Gauge(0.0))
    }

    /// An empty histogram over `bucket_bounds`.
    pub fn histogram(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        bucket_bounds: Vec<f64>,
    ) -> Self {
        let bucket_counts = vec![0; bucket_bounds.len()];
        Self::with_value(
            id,
            description,
            unit,
            MetricValue::Histogram {
                bucket_bounds,
                bucket_counts,
                count: 0,
                sum: 0.0,
            },
        )
    }

    fn with_value(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        value: MetricValue,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            unit: unit.into(),
            value,
            last_updated: Instant::now(),
        }
    }
}

/// A specialized `Result` type for metric-related operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// An error that can occur within the metrics system.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetricsError {
    /// The requested metric was never registered.
    #[error("metric not found: {0}")]
    MetricNotFound(MetricId),
    /// A metric with the same id is already registered.
    #[error("metric already registered: {0}")]
    AlreadyRegistered(MetricId),
    /// An operation was attempted on a metric of the wrong kind.
    #[error("type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// The kind the operation needs.
        expected: MetricKind,
        /// The kind actually stored.
        found: MetricKind,
    },
    /// The storage lock was poisoned by a panicking writer.
    #[error("metrics storage poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_id_formatting() {
        assert_eq!(MetricId::new("assets", "loaded_total").to_string(), "assets:loaded_total");
    }

    #[test]
    fn histogram_mean() {
        let value = MetricValue::Histogram {
            bucket_bounds: vec![1.0],
            bucket_counts: vec![1],
            count: 2,
            sum: 3.0,
        };
        assert_eq!(value.kind(), MetricKind::Histogram);
        assert_eq!(value.histogram_mean(), Some(1.5));
        assert_eq!(MetricValue::Counter(4).histogram_mean(), None);
    }
}
