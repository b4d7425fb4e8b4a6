use crate::storage::traits::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name of the dedup index inside a repository directory
pub const INDEX_FILE_NAME: &str = "index.json";

/// Scratch file `save` writes before renaming over the index
///
/// Ends in `.json` so corpus readers that skip JSON files never mistake a
/// leftover for an article.
pub const INDEX_TMP_FILE_NAME: &str = "index.tmp.json";

/// Dedup index: `dedup_key(slug(title))` -> last store time (epoch seconds)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryIndex {
    entries: BTreeMap<String, i64>,
}

impl RepositoryIndex {
    /// Loads an index file
    ///
    /// A missing file yields an empty index. So does an unreadable or
    /// corrupt one, after a warning: losing dedup history only costs
    /// re-storing articles, never losing them.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("Cannot read index {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!("Ignoring corrupt index {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Writes the whole index to `path`, replacing the previous file
    ///
    /// The index is written to a sibling temporary file first and renamed
    /// into place, so a crash never leaves a half-written index behind. The
    /// temporary file is removed again when either step fails.
    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let json = serde_json::to_string(self)?;
        let tmp_path = tmp_path(path);

        if let Err(e) = std::fs::write(&tmp_path, json) {
            discard(&tmp_path);
            return Err(StorageError::io(&tmp_path, e));
        }
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            discard(&tmp_path);
            return Err(StorageError::io(path, e));
        }

        Ok(())
    }

    /// Removes a scratch file left next to `path` by an interrupted save
    pub fn remove_stale_tmp(path: &Path) {
        let tmp_path = tmp_path(path);
        if tmp_path.is_file() {
            tracing::warn!("Removing stale index file {}", tmp_path.display());
            discard(&tmp_path);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: String, stored_at: i64) {
        self.entries.insert(key, stored_at);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    path.with_file_name(INDEX_TMP_FILE_NAME)
}

fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Cannot remove {}: {}", path.display(), e);
        }
    }
}
