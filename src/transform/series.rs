//! Daily time series

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::semester::DateRange;
use super::rows::Row;

/// One point of the daily commit line chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Keep entries whose ISO date lies inside `range`.
///
/// Rows with an unparseable date are skipped.
pub fn filter_date_range(rows: &[Row], range: DateRange) -> Vec<SeriesPoint> {
    rows.iter()
        .filter_map(|row| match NaiveDate::parse_from_str(row.label.trim(), "%Y-%m-%d") {
            Ok(date) => Some(SeriesPoint { date, value: row.value }),
            Err(e) => {
                debug!("Skipping series entry with invalid date '{}': {}", row.label, e);
                None
            }
        })
        .filter(|point| range.contains(point.date))
        .collect()
}
