//! Tolerant field extraction
//!
//! Documents come from an upstream producer whose field names drifted over
//! time, so every lookup has a default: missing arrays are empty, missing or
//! non-numeric values count as 0 and a missing average is `None`.

use log::debug;
use serde_json::{Map, Value};
use crate::dataset::MetricDataset;
use crate::semester::{normalize_semester_key, Semester};

/// How a metric's fields are laid out inside its document slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Parallel name and value arrays. The first name field present wins.
    Parallel {
        names: &'static [&'static str],
        values: &'static str,
        average: Option<&'static str>,
    },
    /// A bare numeric sample; entities are labelled by position
    Values { field: &'static str },
    /// An object of `category -> count`, or the slice itself when `field` is `None`
    CountMap { field: Option<&'static str> },
    /// A list of objects, each contributing one name and one value
    Records {
        field: Option<&'static str>,
        names: &'static [&'static str],
        value: &'static str,
    },
}

/// Find the slice of a consolidated document for `semester`.
///
/// Keys are compared after normalization, so `"23 Spring"` and `"23spring"`
/// both match.
pub fn locate_semester(document: &Value, semester: Semester) -> Option<&Value> {
    let map = document.as_object()?;
    let key = semester.key();
    if let Some(slice) = map.get(&key) {
        return Some(slice);
    }
    map.iter()
        .find(|(candidate, _)| normalize_semester_key(candidate) == key)
        .map(|(_, slice)| slice)
}

impl Extraction {
    /// Reduce a document slice to a dataset. Never fails.
    pub fn extract(&self, slice: &Value, semester: Semester, metric: &str) -> MetricDataset {
        match self {
            Extraction::Parallel { names, values, average } => {
                let entity_names = names
                    .iter()
                    .find_map(|field| slice.get(*field).and_then(Value::as_array))
                    .map(|items| items.iter().map(label_of).collect())
                    .unwrap_or_default();
                let values = numbers(slice.get(*values));
                let average = average.and_then(|field| slice.get(field)).and_then(Value::as_f64);
                MetricDataset::from_parallel(semester, metric, entity_names, values, average)
            }
            Extraction::Values { field } => {
                MetricDataset::from_values(semester, metric, numbers(slice.get(*field)))
            }
            Extraction::CountMap { field } => {
                let map = field
                    .map_or(Some(slice), |field| slice.get(field))
                    .and_then(Value::as_object);
                let (names, values) = map.map(split_map).unwrap_or_default();
                MetricDataset::from_parallel(semester, metric, names, values, None)
            }
            Extraction::Records { field, names, value } => {
                let records = field
                    .map_or(Some(slice), |field| slice.get(field))
                    .and_then(Value::as_array);
                let mut entity_names = Vec::new();
                let mut values = Vec::new();
                for record in records.into_iter().flatten() {
                    let Some(name) = names.iter().find_map(|field| record.get(*field)) else {
                        debug!("Skipping {} record without a name", metric);
                        continue;
                    };
                    entity_names.push(label_of(name));
                    values.push(record.get(*value).map_or(0.0, number_of));
                }
                MetricDataset::from_parallel(semester, metric, entity_names, values, None)
            }
        }
    }
}

fn split_map(map: &Map<String, Value>) -> (Vec<String>, Vec<f64>) {
    map.iter().map(|(key, value)| (key.clone(), number_of(value))).unzip()
}

fn numbers(field: Option<&Value>) -> Vec<f64> {
    field
        .and_then(Value::as_array)
        .map(|items| items.iter().map(number_of).collect())
        .unwrap_or_default()
}

fn number_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
