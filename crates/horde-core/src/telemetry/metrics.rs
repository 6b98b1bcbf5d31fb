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

use std::fmt::{self, Display};
use std::time::Instant;

/// A unique, structured identifier for a metric.
///
/// A `MetricId` is a namespace (`"collision"`), a name (`"static_ms"`) and an
/// optional set of key-value labels such as `tier=simd`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// The broad category of the metric.
    pub namespace: String,
    /// The specific name of the metric.
    pub name: String,
    /// Key-value pairs, kept sorted by key.
    pub labels: Vec<(String, String)>,
}

impl MetricId {
    /// Creates a new `MetricId` with a namespace and a name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            labels: Vec::new(),
        }
    }

    /// Adds a label, keeping labels sorted for consistent hashing and display.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self.labels.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if !self.labels.is_empty() {
            let labels = self
                .labels
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",");
            write!(f, "[{labels}]")?;
        }
        Ok(())
    }
}

/// The fundamental type of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// A value that only ever increases.
    Counter,
    /// A value that can go up or down.
    Gauge,
    /// A distribution of samples.
    Histogram,
}

/// The current value of a metric.
#[derive(Debug, Clone)]
pub enum MetricValue {
    /// Counter value.
    Counter(u64),
    /// Gauge value.
    Gauge(f64),
    /// Recorded samples and their bucket distribution.
    Histogram {
        /// The raw samples recorded.
        samples: Vec<f64>,
        /// Upper bounds of the buckets.
        bucket_bounds: Vec<f64>,
        /// Samples at or below each bound.
        bucket_counts: Vec<u64>,
    },
}

impl MetricValue {
    /// Returns the [`MetricType`] corresponding to this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricValue::Counter(_) => MetricType::Counter,
            MetricValue::Gauge(_) => MetricType::Gauge,
            MetricValue::Histogram { .. } => MetricType::Histogram,
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

    /// Returns the mean of the samples if this is a non-empty `Histogram`.
    pub fn histogram_mean(&self) -> Option<f64> {
        match self {
            MetricValue::Histogram { samples, .. } if !samples.is_empty() => {
                Some(samples.iter().sum::<f64>() / samples.len() as f64)
            }
            _ => None,
        }
    }
}

/// Descriptive metadata about a metric.
#[derive(Debug, Clone)]
pub struct MetricMetadata {
    /// The metric's unique identifier.
    pub id: MetricId,
    /// The type of the metric.
    pub metric_type: MetricType,
    /// What the metric measures.
    pub description: String,
    /// Unit of measurement (`"ms"`, `"count"`).
    pub unit: String,
    /// When this metric was last updated.
    pub last_updated: Instant,
}

impl MetricMetadata {
    /// Creates new metadata for a metric.
    pub fn new(
        id: MetricId,
        metric_type: MetricType,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id,
            metric_type,
            description: description.into(),
            unit: unit.into(),
            last_updated: Instant::now(),
        }
    }

    /// Updates the `last_updated` timestamp to the current time.
    pub fn touch(&mut self) {
        self.last_updated = Instant::now();
    }
}

/// A metric value together with its metadata.
#[derive(Debug, Clone)]
pub struct Metric {
    /// The descriptive metadata.
    pub metadata: MetricMetadata,
    /// The current value.
    pub value: MetricValue,
}

impl Metric {
    /// Creates a new `Counter` metric starting at zero.
    pub fn counter(id: MetricId, description: impl Into<String>) -> Self {
        Self {
            metadata: MetricMetadata::new(id, MetricType::Counter, description, "count"),
            value: MetricValue::Counter(0),
        }
    }

    /// Creates a new `Gauge` metric starting at zero.
    pub fn gauge(id: MetricId, description: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            metadata: MetricMetadata::new(id, MetricType::Gauge, description, unit),
            value: MetricValue::Gauge(0.0),
        }
    }

    /// Creates a new, empty `Histogram` metric.
    pub fn histogram(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        bucket_bounds: Vec<f64>,
    ) -> Self {
        let bucket_counts = vec![0; bucket_bounds.len()];
        Self {
            metadata: MetricMetadata::new(id, MetricType::Histogram, description, unit),
            value: MetricValue::Histogram {
                samples: Vec::new(),
                bucket_bounds,
                bucket_counts,
            },
        }
    }
}

/// A specialized `Result` type for metric-related operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// An error that can occur within the metrics system.
#[derive(Debug, Clone)]
pub enum MetricsError {
    /// The requested metric was not found.
    MetricNotFound(MetricId),
    /// An operation was attempted on a metric of the wrong type.
    TypeMismatch {
        /// The expected metric type for the operation.
        expected: MetricType,
        /// The actual metric type that was found.
        found: MetricType,
    },
    /// The storage layer failed (e.g. a poisoned lock).
    StorageError(String),
}

impl Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::MetricNotFound(id) => write!(f, "Metric not found: {id}"),
            MetricsError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {expected:?}, found {found:?}")
            }
            MetricsError::StorageError(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for MetricsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_id_labels_are_sorted() {
        let id = MetricId::new("collision", "static_ms")
            .with_label("tier", "simd")
            .with_label("arch", "x86_64");
        assert_eq!(id.labels[0].0, "arch");
        assert_eq!(id.labels[1].0, "tier");
        assert_eq!(id.to_string(), "collision:static_ms[arch=x86_64,tier=simd]");
    }

    #[test]
    fn test_metric_id_without_labels() {
        assert_eq!(
            MetricId::new("collision", "frames").to_string(),
            "collision:frames"
        );
    }

    #[test]
    fn test_metric_constructors() {
        let counter = Metric::counter(MetricId::new("collision", "frames"), "Frames");
        assert_eq!(counter.metadata.metric_type, MetricType::Counter);
        assert_eq!(counter.metadata.unit, "count");
        assert_eq!(counter.value.as_counter(), Some(0));

        let gauge = Metric::gauge(MetricId::new("collision", "live"), "Live", "count");
        assert_eq!(gauge.value.as_gauge(), Some(0.0));
        assert_eq!(gauge.value.as_counter(), None);
    }

    #[test]
    fn test_histogram_mean() {
        let value = MetricValue::Histogram {
            samples: vec![1.0, 2.0, 3.0],
            bucket_bounds: vec![],
            bucket_counts: vec![],
        };
        assert_eq!(value.histogram_mean(), Some(2.0));
        assert_eq!(MetricValue::Gauge(1.0).histogram_mean(), None);
    }
}
