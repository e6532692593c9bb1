//! Metric registry
//!
//! Lookup and selection over the built-in panel table.

pub mod registry;

pub use registry::{PanelDefinition, BUILTIN_PANELS};

use thiserror::Error;

/// Errors raised when selecting panels by name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown metric '{name}'. Valid metrics: {valid}")]
    UnknownMetric { name: String, valid: String },
}

/// Ordered set of panels the dashboard can show
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    panels: Vec<PanelDefinition>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MetricRegistry {
    /// Registry holding every built-in panel
    pub fn builtin() -> Self {
        Self::from_panels(BUILTIN_PANELS.to_vec())
    }

    pub fn from_panels(panels: Vec<PanelDefinition>) -> Self {
        Self { panels }
    }

    pub fn panels(&self) -> &[PanelDefinition] {
        &self.panels
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.panels.iter().map(|p| p.id).collect()
    }

    pub fn get(&self, id: &str) -> Option<&PanelDefinition> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Panels named in `ids`, in registry order. An empty list selects everything.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<PanelDefinition>, RegistryError> {
        if ids.is_empty() {
            return Ok(self.panels.clone());
        }

        for id in ids {
            if self.get(id.as_ref()).is_none() {
                return Err(RegistryError::UnknownMetric {
                    name: id.as_ref().to_string(),
                    valid: self.ids().join(", "),
                });
            }
        }

        Ok(self
            .panels
            .iter()
            .filter(|p| ids.iter().any(|id| id.as_ref() == p.id))
            .copied()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_when_empty() {
        let registry = MetricRegistry::builtin();
        let empty: [&str; 0] = [];
        assert_eq!(registry.select(&empty).unwrap().len(), registry.panels().len());
    }

    #[test]
    fn test_select_keeps_registry_order() {
        let registry = MetricRegistry::builtin();
        let selected = registry
            .select(&["language_distribution", "commit_hourly", "language_distribution"])
            .unwrap();
        let ids: Vec<&str> = selected.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["commit_hourly", "language_distribution"]);
    }

    #[test]
    fn test_select_unknown_metric() {
        let registry = MetricRegistry::builtin();
        let error = registry.select(&["star_count"]).unwrap_err();
        assert!(error.to_string().starts_with("Unknown metric 'star_count'. Valid metrics: commit_date_series"));
    }

    #[test]
    fn test_get() {
        let registry = MetricRegistry::builtin();
        assert_eq!(registry.get("pr_status_distribution").unwrap().presentation.title, "PR Merge Status");
        assert!(registry.get("nope").is_none());
    }
}
