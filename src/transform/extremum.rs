//! Extremum tagging for distribution line charts

use serde::{Deserialize, Serialize};

/// Positions of the largest and smallest values in a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extrema {
    pub max: Option<usize>,
    pub min: Option<usize>,
}

impl Extrema {
    /// Indices to highlight, max first. A single point is reported once.
    pub fn indices(&self, include_min: bool) -> Vec<usize> {
        let mut indices: Vec<usize> = self.max.into_iter().collect();
        if include_min {
            if let Some(min) = self.min {
                if !indices.contains(&min) {
                    indices.push(min);
                }
            }
        }
        indices
    }
}

/// Locate max and min; ties resolve to the first occurrence
pub fn find_extrema(values: &[f64]) -> Extrema {
    let mut extrema = Extrema::default();
    for (i, &value) in values.iter().enumerate() {
        match extrema.max {
            Some(m) if values[m] >= value => {}
            _ => extrema.max = Some(i),
        }
        match extrema.min {
            Some(m) if values[m] <= value => {}
            _ => extrema.min = Some(i),
        }
    }
    extrema
}
