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

//! Registry for managing metrics.

use mosaic_core::telemetry::{
    Metric, MetricId, MetricKind, MetricValue, MetricsError, MetricsResult,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Shared storage behind a registry and all of its handles.
#[derive(Debug, Default)]
struct MetricStore {
    metrics: RwLock<HashMap<MetricId, Metric>>,
}

impl MetricStore {
    fn insert(&self, metric: Metric) -> MetricsResult<()> {
        let mut metrics = self.metrics.write().map_err(|_| MetricsError::Poisoned)?;
        if metrics.contains_key(&metric.id) {
            return Err(MetricsError::AlreadyRegistered(metric.id));
        }
        metrics.insert(metric.id.clone(), metric);
        Ok(())
    }

    fn get(&self, id: &MetricId) -> MetricsResult<Metric> {
        let metrics = self.metrics.read().map_err(|_| MetricsError::Poisoned)?;
        metrics
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    /// Applies `update` to the stored value of `id` under the write lock.
    fn update<T>(
        &self,
        id: &MetricId,
        update: impl FnOnce(&mut MetricValue) -> MetricsResult<T>,
    ) -> MetricsResult<T> {
        let mut metrics = self.metrics.write().map_err(|_| MetricsError::Poisoned)?;
        let metric = metrics
            .get_mut(id)
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))?;
        let result = update(&mut metric.value)?;
        metric.last_updated = Instant::now();
        Ok(result)
    }
}

/// Central registry for the pipeline's metrics.
///
/// Cloning the registry is cheap and shares the underlying storage, so worker
/// threads and the orchestrating thread can all record into the same set.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    store: Arc<MetricStore>,
}

impl MetricsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a counter starting at zero.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        self.store.insert(Metric::counter(id.clone(), description))?;
        Ok(CounterHandle {
            id,
            store: self.store.clone(),
        })
    }

    /// Registers a gauge starting at zero.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        self.store.insert(Metric::gauge(id.clone(), description, unit))?;
        Ok(GaugeHandle {
            id,
            store: self.store.clone(),
        })
    }

    /// Registers a histogram over ascending `buckets`.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        let id = MetricId::new(namespace, name);
        self.store
            .insert(Metric::histogram(id.clone(), description, unit, buckets))?;
        Ok(HistogramHandle {
            id,
            store: self.store.clone(),
        })
    }

    /// Get a metric by ID.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.store.get(id)
    }

    /// Get the total number of metrics.
    pub fn metric_count(&self) -> usize {
        self.store
            .metrics
            .read()
            .map(|metrics| metrics.len())
            .unwrap_or(0)
    }

    /// All metrics, sorted by id.
    pub fn snapshot(&self) -> Vec<Metric> {
        let mut all: Vec<Metric> = match self.store.metrics.read() {
            Ok(metrics) => metrics.values().cloned().collect(),
            Err(_) => {
                log::warn!("[MetricsRegistry] Storage poisoned, snapshot is empty");
                Vec::new()
            }
        };
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Logs every metric at `info` level.
    pub fn log_summary(&self) {
        for metric in self.snapshot() {
            match &metric.value {
                MetricValue::Counter(v) => log::info!("  {} = {}", metric.id, v),
                MetricValue::Gauge(v) => log::info!("  {} = {:.2} {}", metric.id, v, metric.unit),
                MetricValue::Histogram { count, .. } => log::info!(
                    "  {} = {} samples, mean {:.2} {}",
                    metric.id,
                    count,
                    metric.value.histogram_mean().unwrap_or(0.0),
                    metric.unit
                ),
            }
        }
    }
}

/// Handle for counter operations.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    store: Arc<MetricStore>,
}

impl CounterHandle {
    /// Increment the counter by 1.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.increment_by(1)
    }

    /// Increment the counter by a specific amount.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        self.store.update(&self.id, |value| match value {
            MetricValue::Counter(count) => {
                *count = count.saturating_add(amount);
                Ok(*count)
            }
            other => Err(MetricsError::TypeMismatch {
                expected: MetricKind::Counter,
                found: other.kind(),
            }),
        })
    }

    /// Get the current counter value.
    pub fn get(&self) -> MetricsResult<u64> {
        let metric = self.store.get(&self.id)?;
        metric.value.as_counter().ok_or(MetricsError::TypeMismatch {
            expected: MetricKind::Counter,
            found: metric.value.kind(),
        })
    }

    /// Get the metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for gauge operations.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    store: Arc<MetricStore>,
}

impl GaugeHandle {
    /// Set the gauge to a specific value.
    pub fn set(&self, new_value: f64) -> MetricsResult<()> {
        self.store.update(&self.id, |value| match value {
            MetricValue::Gauge(gauge) => {
                *gauge = new_value;
                Ok(())
            }
            other => Err(MetricsError::TypeMismatch {
                expected: MetricKind::Gauge,
                found: other.kind(),
            }),
        })
    }

    /// Get the current gauge value.
    pub fn get(&self) -> MetricsResult<f64> {
        let metric = self.store.get(&self.id)?;
        metric.value.as_gauge().ok_or(MetricsError::TypeMismatch {
            expected: MetricKind::Gauge,
            found: metric.value.kind(),
        })
    }

    /// Get the metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for histogram operations.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    store: Arc<MetricStore>,
}

impl HistogramHandle {
    /// Record a sample in the histogram.
    pub fn observe(&self, sample: f64) -> MetricsResult<()> {
        self.store.update(&self.id, |value| match value {
            MetricValue::Histogram {
                bucket_bounds,
                bucket_counts,
                count,
                sum,
            } => {
                for (bound, bucket) in bucket_bounds.iter().zip(bucket_counts.iter_mut()) {
                    if sample <= *bound {
                        *bucket += 1;
                    }
                }
                *count += 1;
                *sum += sample;
                Ok(())
            }
            other => Err(MetricsError::TypeMismatch {
                expected: MetricKind::Histogram,
                found: other.kind(),
            }),
        })
    }

    /// Get the full histogram metric.
    pub fn get_metric(&self) -> MetricsResult<Metric> {
        self.store.get(&self.id)
    }

    /// Get the metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}
