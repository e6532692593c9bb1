//! Transformer stage
//!
//! Turns a `MetricDataset` into exactly the shape one chart needs. Every
//! transform is a pure function of the dataset; empty input always produces
//! empty output rather than an error.

pub mod rows;
pub mod histogram;
pub mod shares;
pub mod extremum;
pub mod series;

pub use rows::{Row, build_rows, rank_descending, mean, hour_label, label_hours};
pub use histogram::{HistogramBin, BinCount, adaptive_bins, fixed_width_bins, frequency_bins, merge_adjacent_bins};
pub use shares::{CategoryShare, Relabel, OTHER_BUCKET, to_shares, collapse_long_tail, fractions};
pub use extremum::{Extrema, find_extrema};
pub use series::{SeriesPoint, filter_date_range};

use serde::{Deserialize, Serialize};
use crate::dataset::MetricDataset;

/// Transform applied to a dataset before presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Transform {
    /// Per-entity bars, largest first
    Ranked,
    /// Hour-of-day bars in document order
    HourOfDay,
    /// Daily series trimmed to the semester's teaching window
    DateWindow,
    /// Adaptive bins over the observed range
    AdaptiveHistogram(BinCount),
    /// Fixed-width bins over `[0, 1]`
    FixedWidthHistogram { width: f64 },
    /// One bin per distinct value
    Frequency,
    /// Precomputed bins merged two at a time
    MergePairs,
    /// Pie slices, optionally folding a long tail into `"Other"`
    Shares {
        other_threshold: Option<f64>,
        relabel: Relabel,
    },
}

/// Output of the transformer, one variant per chart family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum ChartData {
    Bars(Vec<Row>),
    Histogram(Vec<HistogramBin>),
    Shares(Vec<CategoryShare>),
    Series(Vec<SeriesPoint>),
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            ChartData::Bars(rows) => rows.len(),
            ChartData::Histogram(bins) => bins.len(),
            ChartData::Shares(shares) => shares.len(),
            ChartData::Series(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric value of every point, in order
    pub fn values(&self) -> Vec<f64> {
        match self {
            ChartData::Bars(rows) => rows.iter().map(|r| r.value).collect(),
            ChartData::Histogram(bins) => bins.iter().map(|b| b.count as f64).collect(),
            ChartData::Shares(shares) => shares.iter().map(|s| s.value).collect(),
            ChartData::Series(points) => points.iter().map(|p| p.value).collect(),
        }
    }

    /// Display label of every point, in order
    pub fn labels(&self) -> Vec<String> {
        match self {
            ChartData::Bars(rows) => rows.iter().map(|r| r.label.clone()).collect(),
            ChartData::Histogram(bins) => bins.iter().map(|b| b.label.clone()).collect(),
            ChartData::Shares(shares) => shares.iter().map(|s| s.name.clone()).collect(),
            ChartData::Series(points) => points.iter().map(|p| p.date.to_string()).collect(),
        }
    }
}

impl Transform {
    /// Apply the transform to a dataset
    pub fn apply(&self, dataset: &MetricDataset) -> ChartData {
        match self {
            Transform::Ranked => ChartData::Bars(rank_descending(build_rows(dataset))),
            Transform::HourOfDay => ChartData::Bars(label_hours(build_rows(dataset))),
            Transform::DateWindow => ChartData::Series(filter_date_range(
                &build_rows(dataset),
                dataset.semester.date_range(),
            )),
            Transform::AdaptiveHistogram(strategy) => {
                ChartData::Histogram(adaptive_bins(&dataset.values, *strategy))
            }
            Transform::FixedWidthHistogram { width } => {
                ChartData::Histogram(fixed_width_bins(&dataset.values, *width))
            }
            Transform::Frequency => ChartData::Histogram(frequency_bins(&dataset.values)),
            Transform::MergePairs => ChartData::Histogram(merge_adjacent_bins(&build_rows(dataset))),
            Transform::Shares { other_threshold, relabel } => {
                let shares = to_shares(&build_rows(dataset), *relabel);
                let shares = match other_threshold {
                    Some(threshold) => collapse_long_tail(shares, *threshold),
                    None => shares,
                };
                ChartData::Shares(shares)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semester::Semester;

    fn dataset(names: &[&str], values: &[f64]) -> MetricDataset {
        MetricDataset::from_parallel(
            Semester::Spring2023,
            "test",
            names.iter().map(|s| s.to_string()).collect(),
            values.to_vec(),
            None,
        )
    }

    #[test]
    fn test_ranked_transform() {
        let data = Transform::Ranked.apply(&dataset(&["A", "B", "C", "D", "E"], &[5.0, 3.0, 3.0, 8.0, 1.0]));
        assert_eq!(data.labels(), vec!["D", "A", "B", "C", "E"]);
        assert_eq!(data.values(), vec![8.0, 5.0, 3.0, 3.0, 1.0]);
    }

    #[test]
    fn test_histogram_transform() {
        let data = Transform::AdaptiveHistogram(BinCount::Fixed(3))
            .apply(&dataset(&["a", "b", "c", "d", "e"], &[1.0, 2.0, 2.0, 3.0, 9.0]));
        assert_eq!(data.labels(), vec!["1-3", "4-6", "7-9"]);
        assert_eq!(data.values().iter().sum::<f64>(), 5.0);
    }

    #[test]
    fn test_shares_transform_with_relabel() {
        let data = Transform::Shares { other_threshold: None, relabel: Relabel::GroupSize }
            .apply(&dataset(&["3", "4"], &[10.0, 20.0]));
        assert_eq!(data.labels(), vec!["3-people-group", "4-people-group"]);
    }

    #[test]
    fn test_date_window_uses_dataset_semester() {
        let data = Transform::DateWindow.apply(&dataset(
            &["2022-12-31", "2023-03-01", "2024-03-01"],
            &[1.0, 2.0, 3.0],
        ));
        assert_eq!(data.labels(), vec!["2023-03-01"]);
    }

    #[test]
    fn test_every_transform_is_empty_on_empty_input() {
        let empty = MetricDataset::empty(Semester::Spring2024, "test");
        let transforms = [
            Transform::Ranked,
            Transform::HourOfDay,
            Transform::DateWindow,
            Transform::AdaptiveHistogram(BinCount::SquareRoot),
            Transform::FixedWidthHistogram { width: 0.05 },
            Transform::Frequency,
            Transform::MergePairs,
            Transform::Shares { other_threshold: Some(0.03), relabel: Relabel::None },
        ];
        for transform in transforms {
            assert!(transform.apply(&empty).is_empty(), "{:?} should be empty", transform);
        }
    }
}
