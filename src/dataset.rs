//! Metric datasets
//!
//! A `MetricDataset` is the normalised form every loaded document is reduced to:
//! parallel sequences of entity names and numeric values, plus an optional
//! average precomputed by the upstream producer.

use serde::{Deserialize, Serialize};
use crate::semester::Semester;

/// Parallel name/value sequences for one metric in one semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDataset {
    pub semester: Semester,
    pub metric: String,
    pub entity_names: Vec<String>,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

impl MetricDataset {
    /// Dataset with no entries, used whenever loading fails
    pub fn empty(semester: Semester, metric: impl Into<String>) -> Self {
        Self {
            semester,
            metric: metric.into(),
            entity_names: Vec::new(),
            values: Vec::new(),
            average: None,
        }
    }

    /// Build from parallel sequences.
    ///
    /// Names drive the length: positions with no value default to 0 and
    /// values without a name are dropped.
    pub fn from_parallel(
        semester: Semester,
        metric: impl Into<String>,
        entity_names: Vec<String>,
        mut values: Vec<f64>,
        average: Option<f64>,
    ) -> Self {
        values.resize(entity_names.len(), 0.0);
        Self {
            semester,
            metric: metric.into(),
            entity_names,
            values,
            average,
        }
    }

    /// Build from an unnamed sample; entities are labelled by position
    pub fn from_values(semester: Semester, metric: impl Into<String>, values: Vec<f64>) -> Self {
        let entity_names = (1..=values.len()).map(|i| i.to_string()).collect();
        Self {
            semester,
            metric: metric.into(),
            entity_names,
            values,
            average: None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, value)` pairs in document order
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entity_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Sum of all values
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}
