//! Document sources
//!
//! A source turns a `DocumentLocation` into parsed JSON. Locations are
//! relative paths so the same layout works for a directory on disk and for
//! a static web root.

use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use crate::semester::Semester;
use super::error::{LoadError, LoadResult};

/// Name of the consolidated document at the root of a data set
pub const CONSOLIDATED_FILE: &str = "chart_data.json";

/// Directory holding per-semester, per-metric files
pub const PER_METRIC_DIR: &str = "output";

/// Upper bound on one HTTP request, so a stalled server still ends in no data
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// How documents are laid out under the source root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceLayout {
    /// One `chart_data.json` keyed by normalized semester name
    #[default]
    Consolidated,
    /// `output/{semester}/{file}.json`, one file per metric
    PerMetric,
}

impl std::str::FromStr for SourceLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "consolidated" => Ok(SourceLayout::Consolidated),
            "per-metric" | "permetric" => Ok(SourceLayout::PerMetric),
            _ => Err(format!(
                "Invalid layout: {}. Valid options: consolidated, per-metric",
                s
            )),
        }
    }
}

impl std::fmt::Display for SourceLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLayout::Consolidated => write!(f, "consolidated"),
            SourceLayout::PerMetric => write!(f, "per-metric"),
        }
    }
}

/// A document to fetch, relative to the source root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentLocation {
    Consolidated,
    PerMetric {
        semester: Semester,
        file_name: &'static str,
    },
}

impl DocumentLocation {
    /// Path relative to the source root, using `/` separators
    pub fn relative_path(&self) -> String {
        match self {
            DocumentLocation::Consolidated => CONSOLIDATED_FILE.to_string(),
            DocumentLocation::PerMetric { semester, file_name } => format!(
                "{}/{}/{}.json",
                PER_METRIC_DIR,
                semester.display_name(),
                file_name
            ),
        }
    }
}

impl std::fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.relative_path())
    }
}

/// Something that can produce JSON documents
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human readable description for log lines
    fn describe(&self) -> String;

    /// Fetch and parse one document
    async fn fetch(&self, location: &DocumentLocation) -> LoadResult<Value>;
}

fn parse_document(location: &str, body: &str) -> LoadResult<Value> {
    serde_json::from_str(body).map_err(|source| LoadError::Parse {
        location: location.to_string(),
        source,
    })
}

/// Documents stored under a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, location: &DocumentLocation) -> PathBuf {
        let mut path = self.root.clone();
        for part in location.relative_path().split('/') {
            path.push(part);
        }
        path
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    async fn fetch(&self, location: &DocumentLocation) -> LoadResult<Value> {
        let path = self.path_for(location);
        debug!("Reading {}", path.display());
        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            })?;
        parse_document(&path.display().to_string(), &body)
    }
}

/// Documents served over HTTP below a base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Source with the default request timeout
    pub fn new(base_url: impl Into<String>) -> LoadResult<Self> {
        Self::with_timeout(base_url, HTTP_TIMEOUT)
    }

    /// Source whose requests fail once `timeout` elapses
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> LoadResult<Self> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::http(&base_url, format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn url_for(&self, location: &DocumentLocation) -> String {
        format!("{}/{}", self.base_url, location.relative_path())
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn describe(&self) -> String {
        format!("base URL {}", self.base_url)
    }

    async fn fetch(&self, location: &DocumentLocation) -> LoadResult<Value> {
        let url = self.url_for(location);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LoadError::http(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::http(&url, format!("HTTP status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LoadError::http(&url, e.to_string()))?;
        parse_document(&url, &body)
    }
}

/// Preloaded documents keyed by relative path
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: Mutex<HashMap<String, Value>>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document at `location`
    pub fn insert(&self, location: &DocumentLocation, document: Value) {
        self.documents.lock().insert(location.relative_path(), document);
    }

    pub fn with_document(self, location: &DocumentLocation, document: Value) -> Self {
        self.insert(location, document);
        self
    }

    /// Number of fetch calls served, including failed ones
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} documents)", self.documents.lock().len())
    }

    async fn fetch(&self, location: &DocumentLocation) -> LoadResult<Value> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let path = location.relative_path();
        self.documents
            .lock()
            .get(&path)
            .cloned()
            .ok_or_else(|| LoadError::not_found(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_layout_parsing() {
        assert_eq!("consolidated".parse::<SourceLayout>().unwrap(), SourceLayout::Consolidated);
        assert_eq!("per-metric".parse::<SourceLayout>().unwrap(), SourceLayout::PerMetric);
        assert_eq!("PER_METRIC".parse::<SourceLayout>().unwrap(), SourceLayout::PerMetric);
        assert!("flat".parse::<SourceLayout>().is_err());
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(DocumentLocation::Consolidated.relative_path(), "chart_data.json");
        let location = DocumentLocation::PerMetric {
            semester: Semester::Spring2024,
            file_name: "pr_count_per_repo",
        };
        assert_eq!(location.relative_path(), "output/24 Spring/pr_count_per_repo.json");
    }

    #[test]
    fn test_http_url_joins_base() {
        let source = HttpSource::new("https://example.org/dashboard/").unwrap();
        assert_eq!(
            source.url_for(&DocumentLocation::Consolidated),
            "https://example.org/dashboard/chart_data.json"
        );
    }

    #[tokio::test]
    async fn test_http_source_times_out_on_stalled_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        // Accept connections and never answer
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let source = HttpSource::with_timeout(format!("http://{}", address), Duration::from_millis(200)).unwrap();
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            source.fetch(&DocumentLocation::Consolidated),
        )
        .await
        .expect("fetch should give up on its own");
        assert!(matches!(result, Err(LoadError::Http { .. })));
        server.abort();
    }

    #[tokio::test]
    async fn test_file_source_reads_per_metric_files() {
        let dir = TempDir::new().unwrap();
        let semester_dir = dir.path().join("output").join("23 Spring");
        std::fs::create_dir_all(&semester_dir).unwrap();
        std::fs::write(semester_dir.join("pr_status_distribution.json"), r#"{"merged": 3}"#).unwrap();

        let source = FileSource::new(dir.path());
        let location = DocumentLocation::PerMetric {
            semester: Semester::Spring2023,
            file_name: "pr_status_distribution",
        };
        let document = source.fetch(&location).await.unwrap();
        assert_eq!(document, json!({"merged": 3}));
    }

    #[tokio::test]
    async fn test_file_source_errors() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path());
        let missing = source.fetch(&DocumentLocation::Consolidated).await;
        assert!(matches!(missing, Err(LoadError::Io { .. })));

        std::fs::write(dir.path().join("chart_data.json"), "{not json").unwrap();
        let broken = source.fetch(&DocumentLocation::Consolidated).await;
        assert!(matches!(broken, Err(LoadError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_memory_source_counts_fetches() {
        let source = MemorySource::new().with_document(&DocumentLocation::Consolidated, json!({}));
        assert!(source.fetch(&DocumentLocation::Consolidated).await.is_ok());
        let missing = DocumentLocation::PerMetric {
            semester: Semester::Spring2025,
            file_name: "language_distribution",
        };
        assert!(matches!(source.fetch(&missing).await, Err(LoadError::NotFound { .. })));
        assert_eq!(source.fetch_count(), 2);
    }
}
