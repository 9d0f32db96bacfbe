//! Extractor-specific types: errors and configuration.

use thiserror::Error;

/// Errors that end a file or a whole run.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// I/O error reading an RF2 file.
    #[error("IO error reading RF2 file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// The destination store failed during setup or a catalog-wide query.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for extractor operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors raised by a [`TemplateStore`](crate::TemplateStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored route is not part of the route vocabulary.
    #[error("Invalid route stored in catalog: {0}")]
    InvalidRoute(String),

    /// The store refused the operation.
    #[error("Store rejected operation: {0}")]
    Rejected(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Configuration for an extraction run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Records buffered before the loader flushes to the store.
    pub batch_size: usize,
    /// Insert failures logged in detail before the loader goes quiet.
    pub max_logged_errors: u64,
    /// Lines between progress log events (0 disables progress logging).
    pub progress_interval: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_logged_errors: 5,
            progress_interval: 1_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_logged_errors, 5);
    }

    #[test]
    fn test_store_error_wraps_into_extract_error() {
        let err: ExtractError = StoreError::Rejected("read-only".to_string()).into();
        assert_eq!(err.to_string(), "Store error: Store rejected operation: read-only");
    }
}
