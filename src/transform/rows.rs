//! Per-entity rows and ranking

use serde::{Deserialize, Serialize};
use crate::dataset::MetricDataset;

/// One bar in a per-entity comparison chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub label: String,
    pub value: f64,
}

impl Row {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value }
    }
}

/// Zip names with values in document order
pub fn build_rows(dataset: &MetricDataset) -> Vec<Row> {
    dataset
        .entries()
        .map(|(name, value)| Row::new(name, value))
        .collect()
}

/// Sort rows by value, largest first. Equal values keep their input order.
pub fn rank_descending(mut rows: Vec<Row>) -> Vec<Row> {
    // sort_by is stable
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    rows
}

/// Arithmetic mean, `None` for an empty sample
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Label an hour-of-day bucket as `"HH:00 - HH:00"`, wrapping at midnight
pub fn hour_label(hour: u32) -> String {
    let next = (hour + 1) % 24;
    format!("{:02}:00 - {:02}:00", hour % 24, next)
}

/// Relabel rows whose label is an hour number; other labels are left alone
pub fn label_hours(rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter()
        .map(|row| match row.label.trim().parse::<u32>() {
            Ok(hour) => Row::new(hour_label(hour), row.value),
            Err(_) => row,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semester::Semester;

    fn rows(items: &[(&str, f64)]) -> Vec<Row> {
        items.iter().map(|(l, v)| Row::new(*l, *v)).collect()
    }

    #[test]
    fn test_rank_descending_is_stable() {
        let input = rows(&[("A", 5.0), ("B", 3.0), ("C", 3.0), ("D", 8.0), ("E", 1.0)]);
        let ranked = rank_descending(input);
        let labels: Vec<&str> = ranked.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["D", "A", "B", "C", "E"]);
        let values: Vec<f64> = ranked.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![8.0, 5.0, 3.0, 3.0, 1.0]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_descending(Vec::new()).is_empty());
    }

    #[test]
    fn test_build_rows_defaults_missing_values() {
        let dataset = MetricDataset::from_parallel(
            Semester::Spring2023,
            "issue_count_per_repo",
            vec!["g1".into(), "g2".into()],
            vec![7.0],
            None,
        );
        assert_eq!(build_rows(&dataset), rows(&[("g1", 7.0), ("g2", 0.0)]));
    }

    #[test]
    fn test_precomputed_average_matches_mean() {
        let values = vec![12.0, 30.0, 18.0];
        let dataset = MetricDataset::from_parallel(
            Semester::Spring2024,
            "commit_count_per_repo",
            vec!["a".into(), "b".into(), "c".into()],
            values.clone(),
            Some(20.0),
        );
        assert_eq!(dataset.average, mean(&values));
    }

    #[test]
    fn test_mean_of_empty_sample() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_hour_labels() {
        assert_eq!(hour_label(0), "00:00 - 01:00");
        assert_eq!(hour_label(9), "09:00 - 10:00");
        assert_eq!(hour_label(23), "23:00 - 00:00");
    }

    #[test]
    fn test_label_hours_keeps_non_numeric_labels() {
        let labelled = label_hours(rows(&[("13", 4.0), ("noon", 2.0)]));
        assert_eq!(labelled[0].label, "13:00 - 14:00");
        assert_eq!(labelled[1].label, "noon");
    }
}
