//! Data Loader
//!
//! Fetches source documents and reduces them to `MetricDataset`s. Failures
//! are logged and replaced by an empty dataset; nothing here returns an
//! error to the caller.

pub mod error;
pub mod extract;
pub mod source;

pub use error::{LoadError, LoadResult};
pub use extract::{Extraction, locate_semester};
pub use source::{
    DocumentLocation, DocumentSource, FileSource, HttpSource, MemorySource, SourceLayout,
    CONSOLIDATED_FILE, HTTP_TIMEOUT, PER_METRIC_DIR,
};

use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;
use crate::dataset::MetricDataset;
use crate::semester::Semester;

/// Where one metric lives in the source documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSource {
    /// Key of the metric inside a semester slice of the consolidated document
    pub key: &'static str,
    /// File stem in the per-metric layout
    pub file_name: &'static str,
    pub extraction: Extraction,
}

/// Resolves, fetches and extracts metric documents from one source
#[derive(Clone)]
pub struct DataLoader {
    source: Arc<dyn DocumentSource>,
    layout: SourceLayout,
}

impl std::fmt::Debug for DataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoader")
            .field("source", &self.source.describe())
            .field("layout", &self.layout)
            .finish()
    }
}

impl DataLoader {
    pub fn new(source: Arc<dyn DocumentSource>, layout: SourceLayout) -> Self {
        Self { source, layout }
    }

    pub fn layout(&self) -> SourceLayout {
        self.layout
    }

    pub fn describe(&self) -> String {
        format!("{} ({} layout)", self.source.describe(), self.layout)
    }

    /// Document that holds `metric` for `semester`
    pub fn location_for(&self, semester: Semester, metric: &MetricSource) -> DocumentLocation {
        match self.layout {
            SourceLayout::Consolidated => DocumentLocation::Consolidated,
            SourceLayout::PerMetric => DocumentLocation::PerMetric {
                semester,
                file_name: metric.file_name,
            },
        }
    }

    /// Fetch a document, logging and swallowing any failure
    pub async fn fetch(&self, location: &DocumentLocation) -> Option<Value> {
        match self.source.fetch(location).await {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("Failed to load {} from {}: {}", location, self.source.describe(), e);
                None
            }
        }
    }

    /// Fetch and extract one metric
    pub async fn load(&self, semester: Semester, metric: &MetricSource) -> MetricDataset {
        let location = self.location_for(semester, metric);
        let document = self.fetch(&location).await;
        self.extract(document.as_ref(), semester, metric)
    }

    /// Warn once when a fetched consolidated document has no slice for `semester`.
    ///
    /// Returns `false` when the slice is missing.
    pub fn check_semester(&self, document: &Value, semester: Semester) -> bool {
        if self.layout != SourceLayout::Consolidated || locate_semester(document, semester).is_some() {
            return true;
        }
        warn!("No {} section in {} from {}", semester, CONSOLIDATED_FILE, self.source.describe());
        false
    }

    /// Extract one metric from an already fetched document.
    ///
    /// `document` is the consolidated document or the metric's own file,
    /// depending on the layout. `None` yields an empty dataset.
    pub fn extract(
        &self,
        document: Option<&Value>,
        semester: Semester,
        metric: &MetricSource,
    ) -> MetricDataset {
        let Some(document) = document else {
            return MetricDataset::empty(semester, metric.key);
        };

        let slice = match self.layout {
            SourceLayout::PerMetric => Some(document),
            SourceLayout::Consolidated => match locate_semester(document, semester) {
                Some(semester_slice) => semester_slice.get(metric.key),
                None => {
                    debug!("No {} section in {} for {}", semester, CONSOLIDATED_FILE, metric.key);
                    None
                }
            },
        };

        match slice {
            Some(slice) => {
                let dataset = metric.extraction.extract(slice, semester, metric.key);
                debug!("Loaded {} for {}: {} entries", metric.key, semester, dataset.len());
                dataset
            }
            None => {
                debug!("No {} data for {}", metric.key, semester);
                MetricDataset::empty(semester, metric.key)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PR_STATUS: MetricSource = MetricSource {
        key: "pr_status_distribution",
        file_name: "pr_status_distribution",
        extraction: Extraction::CountMap { field: None },
    };

    fn consolidated() -> Arc<MemorySource> {
        Arc::new(MemorySource::new().with_document(
            &DocumentLocation::Consolidated,
            json!({"23spring": {"pr_status_distribution": {"merged": 5, "open": 1}}}),
        ))
    }

    #[tokio::test]
    async fn test_load_from_consolidated_document() {
        let loader = DataLoader::new(consolidated(), SourceLayout::Consolidated);
        let dataset = loader.load(Semester::Spring2023, &PR_STATUS).await;
        assert_eq!(dataset.entity_names, vec!["merged", "open"]);
        assert_eq!(dataset.semester, Semester::Spring2023);
    }

    #[tokio::test]
    async fn test_missing_semester_is_empty() {
        let loader = DataLoader::new(consolidated(), SourceLayout::Consolidated);
        assert!(loader.load(Semester::Spring2024, &PR_STATUS).await.is_empty());
    }

    #[test]
    fn test_check_semester() {
        let consolidated_loader = DataLoader::new(consolidated(), SourceLayout::Consolidated);
        let document = json!({"23spring": {}});
        assert!(consolidated_loader.check_semester(&document, Semester::Spring2023));
        assert!(!consolidated_loader.check_semester(&document, Semester::Spring2024));

        let per_metric = DataLoader::new(consolidated(), SourceLayout::PerMetric);
        assert!(per_metric.check_semester(&json!({"merged": 1}), Semester::Spring2024));
    }

    #[tokio::test]
    async fn test_load_from_per_metric_file() {
        let location = DocumentLocation::PerMetric {
            semester: Semester::Spring2025,
            file_name: "pr_status_distribution",
        };
        let source = Arc::new(MemorySource::new().with_document(&location, json!({"closed": 2})));
        let loader = DataLoader::new(source, SourceLayout::PerMetric);
        assert_eq!(loader.location_for(Semester::Spring2025, &PR_STATUS), location);
        let dataset = loader.load(Semester::Spring2025, &PR_STATUS).await;
        assert_eq!(dataset.values, vec![2.0]);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty_dataset() {
        let loader = DataLoader::new(Arc::new(MemorySource::new()), SourceLayout::PerMetric);
        let dataset = loader.load(Semester::Spring2023, &PR_STATUS).await;
        assert!(dataset.is_empty());
        assert_eq!(dataset.metric, "pr_status_distribution");
    }
}
