//! Semester selection
//!
//! The dashboard covers a fixed set of academic terms. Each term has a display
//! name (`"23 Spring"`), a normalised lookup key (`"23spring"`) used to index the
//! consolidated dataset, and a calendar window used to trim the daily commit series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a semester name does not match any known term
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown semester '{name}'. Valid semesters: {valid}")]
pub struct UnknownSemester {
    pub name: String,
    pub valid: String,
}

/// Academic terms covered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Semester {
    #[serde(rename = "23 Spring")]
    Spring2023,
    #[serde(rename = "24 Spring")]
    Spring2024,
    #[serde(rename = "25 Spring")]
    Spring2025,
}

/// All selectable semesters, in the order the selector lists them
pub const SEMESTERS: [Semester; 3] = [
    Semester::Spring2023,
    Semester::Spring2024,
    Semester::Spring2025,
];

impl Semester {
    /// Every selectable semester
    pub fn all() -> &'static [Semester] {
        &SEMESTERS
    }

    /// Human-readable name, also used in per-metric document paths
    pub fn display_name(&self) -> &'static str {
        match self {
            Semester::Spring2023 => "23 Spring",
            Semester::Spring2024 => "24 Spring",
            Semester::Spring2025 => "25 Spring",
        }
    }

    /// Normalised key used in the consolidated document
    pub fn key(&self) -> String {
        normalize_semester_key(self.display_name())
    }

    /// Teaching window for the term, inclusive on both ends
    pub fn date_range(&self) -> DateRange {
        let year = match self {
            Semester::Spring2023 => 2023,
            Semester::Spring2024 => 2024,
            Semester::Spring2025 => 2025,
        };
        DateRange::spring_term(year)
    }
}

impl Default for Semester {
    fn default() -> Self {
        Semester::Spring2023
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Semester {
    type Err = UnknownSemester;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_semester_key(s);
        SEMESTERS
            .iter()
            .copied()
            .find(|semester| semester.key() == key)
            .ok_or_else(|| UnknownSemester {
                name: s.to_string(),
                valid: SEMESTERS
                    .iter()
                    .map(|semester| semester.display_name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Strip all whitespace and lowercase, so `"23 Spring"` becomes `"23spring"`
pub fn normalize_semester_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Inclusive calendar window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Spring teaching term: 1 February to 10 June
    fn spring_term(year: i32) -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(year, 2, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(year, 6, 10).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
