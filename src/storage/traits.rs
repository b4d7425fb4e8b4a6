//! Storage traits and error types

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Index serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A store of harvested articles, de-duplicated by title
pub trait ContentStore {
    /// Stores an article
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The article was written
    /// * `Ok(false)` - Blank title or content, or an article with the same
    ///   title slug is already indexed
    /// * `Err(StorageError)` - The article file could not be written
    fn store_article(&mut self, title: &str, content: &str) -> StorageResult<bool>;

    /// Persists the dedup index, replacing any previous version
    fn dump_index(&self) -> StorageResult<()>;

    /// Number of indexed articles
    fn article_count(&self) -> usize;
}
