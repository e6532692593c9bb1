//! Loader Error Types

use thiserror::Error;

/// Result type for loader operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised while fetching or decoding a source document.
///
/// These never reach the presenter: the loader logs them and substitutes an
/// empty dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document could not be read from disk
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request failed or returned a non-success status
    #[error("Failed to fetch {url}: {message}")]
    Http { url: String, message: String },

    /// The body was not valid JSON
    #[error("Failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    /// No document was registered for the location
    #[error("Document not found: {location}")]
    NotFound { location: String },
}

impl LoadError {
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            location: location.into(),
        }
    }
}
