//! Histogram binning
//!
//! Three flavours are used by the dashboard:
//!
//! * adaptive bins over the observed range of an integer-valued sample
//!   (commit, PR and issue counts per group),
//! * fixed-width bins over the closed domain `[0, 1]` (Gini coefficients),
//! * one bin per distinct value (branch counts).
//!
//! Adaptive bins describe inclusive integer ranges (`"4-6"`), fixed-width bins
//! describe half-open intervals whose last bin also holds the domain maximum.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use super::rows::Row;

/// Tolerance applied when deriving the number of fixed-width bins
const EDGE_EPSILON: f64 = 1e-9;

/// Distance from an edge, in absolute terms, still treated as on the edge
const EDGE_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// A contiguous range of values and the number of samples inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn new(label: impl Into<String>, start: f64, end: f64, count: usize) -> Self {
        Self { label: label.into(), start, end, count }
    }

    /// Rebuild a bin from a precomputed `"start–end"` label
    pub fn from_labelled(label: &str, count: usize) -> Self {
        let (start, end) = split_range_label(label);
        Self {
            label: label.to_string(),
            start: start.trim().parse().unwrap_or(0.0),
            end: end.trim().parse().unwrap_or(0.0),
            count,
        }
    }
}

/// How many bins an adaptive histogram targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BinCount {
    /// Fixed upper bound on the number of bins
    Fixed(usize),
    /// `ceil(sqrt(n))` bins for a sample of size `n`
    SquareRoot,
}

impl BinCount {
    fn target(&self, sample_size: usize) -> usize {
        match self {
            BinCount::Fixed(n) => (*n).max(1),
            BinCount::SquareRoot => ((sample_size as f64).sqrt().ceil() as usize).max(1),
        }
    }
}

/// Bin an integer-valued sample over its observed range.
///
/// `width = max(1, ceil((max - min + 1) / bins))` and each value goes to bin
/// `min(floor((value - min) / width), bins - 1)`. A fixed target is shrunk to
/// the number of bins actually needed to reach the maximum.
pub fn adaptive_bins(values: &[f64], strategy: BinCount) -> Vec<HistogramBin> {
    let sample: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some((min, max)) = min_max(&sample) else {
        return Vec::new();
    };

    let span = max - min + 1.0;
    let target = strategy.target(sample.len());
    let width = (span / target as f64).ceil().max(1.0);
    let num_bins = match strategy {
        BinCount::Fixed(_) => ((span / width).ceil() as usize).max(1),
        BinCount::SquareRoot => target,
    };

    let mut counts = vec![0usize; num_bins];
    for value in &sample {
        let index = (((value - min) / width).floor() as usize).min(num_bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = min + i as f64 * width;
            let end = start + width - 1.0;
            HistogramBin::new(format!("{}-{}", start, end), start, end, count)
        })
        .collect()
}

/// Bin a sample over the fixed domain `[0, 1]` using bins of `width`.
///
/// Bins are half-open `[k * width, (k + 1) * width)`. A value on an inner
/// edge, up to floating point rounding, belongs to the bin above it; the
/// domain maximum belongs to the last bin. Values outside the domain are
/// clamped.
pub fn fixed_width_bins(values: &[f64], width: f64) -> Vec<HistogramBin> {
    if values.is_empty() || !(width > 0.0) {
        return Vec::new();
    }

    let num_bins = ((1.0 / width - EDGE_EPSILON).ceil() as usize).max(1);
    let mut counts = vec![0usize; num_bins];
    for value in values.iter().filter(|v| v.is_finite()) {
        let value = value.clamp(0.0, 1.0);
        let mut scaled = (value / width).floor();
        // 0.3 / 0.1 is 2.999..., which still sits on the edge of bin 3
        if ((scaled + 1.0) * width - value).abs() <= EDGE_TOLERANCE {
            scaled += 1.0;
        }
        let index = (scaled as usize).min(num_bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = i as f64 * width;
            let end = ((i + 1) as f64 * width).min(1.0);
            HistogramBin::new(format!("{:.2}–{:.2}", start, end), start, end, count)
        })
        .collect()
}

/// One bin per distinct (rounded) value, ascending
pub fn frequency_bins(values: &[f64]) -> Vec<HistogramBin> {
    let mut frequencies: BTreeMap<i64, usize> = BTreeMap::new();
    for value in values.iter().filter(|v| v.is_finite()) {
        *frequencies.entry(value.round() as i64).or_insert(0) += 1;
    }

    frequencies
        .into_iter()
        .map(|(value, count)| {
            HistogramBin::new(value.to_string(), value as f64, value as f64, count)
        })
        .collect()
}

/// Merge precomputed bins two at a time.
///
/// `"0–4"` and `"5–9"` become `"0-9"` with the counts summed; an odd trailing
/// bin is kept on its own.
pub fn merge_adjacent_bins(rows: &[Row]) -> Vec<HistogramBin> {
    rows.chunks(2)
        .map(|pair| {
            let first = &pair[0];
            let last = pair.last().unwrap_or(first);
            let (start, _) = split_range_label(&first.label);
            let (_, end) = split_range_label(&last.label);
            let count: f64 = pair.iter().map(|row| row.value).sum();
            let label = format!("{}-{}", start.trim(), end.trim());
            HistogramBin::from_labelled(&label, count.max(0.0) as usize)
        })
        .collect()
}

/// Split `"a–b"` (en dash) or `"a-b"` into its two halves
fn split_range_label(label: &str) -> (&str, &str) {
    if let Some((start, end)) = label.split_once('–') {
        return (start, end);
    }
    // Skip a leading sign so "-5-0" splits after the first number
    let offset = usize::from(label.starts_with('-'));
    match label[offset..].find('-') {
        Some(position) => (&label[..offset + position], &label[offset + position + 1..]),
        None => (label, label),
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}
