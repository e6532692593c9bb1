//! Category shares for pie charts

use serde::{Deserialize, Serialize};
use super::rows::Row;

/// Name of the bucket that absorbs long-tail categories
pub const OTHER_BUCKET: &str = "Other";

/// One slice of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    pub value: f64,
}

impl CategoryShare {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self { name: name.into(), value }
    }
}

/// How raw category keys are turned into display names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relabel {
    /// Keep keys as they are
    None,
    /// Contributor group sizes: `"3"` becomes `"3-people-group"`
    GroupSize,
    /// Commit message languages: `chinese`, `english`, anything else is `Mix`
    MessageLanguage,
}

impl Relabel {
    pub fn apply(&self, key: &str) -> String {
        match self {
            Relabel::None => key.to_string(),
            Relabel::GroupSize => format!("{}-people-group", key),
            Relabel::MessageLanguage => match key {
                "chinese" => "Chinese".to_string(),
                "english" => "English".to_string(),
                _ => "Mix".to_string(),
            },
        }
    }
}

/// Turn rows into shares, keeping input order
pub fn to_shares(rows: &[Row], relabel: Relabel) -> Vec<CategoryShare> {
    rows.iter()
        .map(|row| CategoryShare::new(relabel.apply(&row.label), row.value))
        .collect()
}

/// Fold every share below `threshold * total` into a trailing `"Other"` bucket.
///
/// The bucket is only emitted when it holds a nonzero total, so the sum of the
/// result always equals the sum of the input.
pub fn collapse_long_tail(shares: Vec<CategoryShare>, threshold: f64) -> Vec<CategoryShare> {
    let total: f64 = shares.iter().map(|s| s.value).sum();
    let cutoff = total * threshold;

    let mut kept = Vec::with_capacity(shares.len() + 1);
    let mut other = 0.0;
    for share in shares {
        if share.value >= cutoff {
            kept.push(share);
        } else {
            other += share.value;
        }
    }

    if other != 0.0 {
        kept.push(CategoryShare::new(OTHER_BUCKET, other));
    }
    kept
}

/// Fraction of the total held by each share, 0 when the total is 0
pub fn fractions(shares: &[CategoryShare]) -> Vec<f64> {
    let total: f64 = shares.iter().map(|s| s.value).sum();
    shares
        .iter()
        .map(|s| if total == 0.0 { 0.0 } else { s.value / total })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shares(items: &[(&str, f64)]) -> Vec<CategoryShare> {
        items.iter().map(|(n, v)| CategoryShare::new(*n, *v)).collect()
    }

    #[test]
    fn test_collapse_long_tail_worked_example() {
        let input = shares(&[("python", 50.0), ("js", 45.0), ("rust", 2.0), ("go", 3.0)]);
        let collapsed = collapse_long_tail(input, 0.03);
        assert_eq!(
            collapsed,
            shares(&[("python", 50.0), ("js", 45.0), ("go", 3.0), ("Other", 2.0)])
        );
    }

    #[test]
    fn test_no_other_bucket_when_nothing_collapses() {
        let input = shares(&[("open", 10.0), ("closed", 30.0)]);
        let collapsed = collapse_long_tail(input.clone(), 0.03);
        assert_eq!(collapsed, input);
    }

    #[test]
    fn test_zero_valued_tail_is_dropped_without_other() {
        let input = shares(&[("a", 10.0), ("b", 0.0)]);
        let collapsed = collapse_long_tail(input, 0.5);
        assert_eq!(collapsed, shares(&[("a", 10.0)]));
    }

    #[test]
    fn test_collapse_preserves_total() {
        let input = shares(&[("a", 1.0), ("b", 1.0), ("c", 40.0), ("d", 2.0), ("e", 56.0)]);
        let total: f64 = input.iter().map(|s| s.value).sum();
        let collapsed = collapse_long_tail(input, 0.1);
        assert_eq!(collapsed.iter().map(|s| s.value).sum::<f64>(), total);
        assert_eq!(collapsed.last().unwrap().name, OTHER_BUCKET);
    }

    #[test]
    fn test_collapse_empty() {
        assert!(collapse_long_tail(Vec::new(), 0.03).is_empty());
    }

    #[test]
    fn test_relabel() {
        assert_eq!(Relabel::GroupSize.apply("4"), "4-people-group");
        assert_eq!(Relabel::MessageLanguage.apply("chinese"), "Chinese");
        assert_eq!(Relabel::MessageLanguage.apply("english"), "English");
        assert_eq!(Relabel::MessageLanguage.apply("mixed"), "Mix");
        assert_eq!(Relabel::None.apply("merged"), "merged");
    }

    #[test]
    fn test_fractions() {
        let input = shares(&[("a", 1.0), ("b", 3.0)]);
        assert_eq!(fractions(&input), vec![0.25, 0.75]);
        assert_eq!(fractions(&shares(&[("a", 0.0)])), vec![0.0]);
    }
}
