use crate::storage::index::{RepositoryIndex, INDEX_FILE_NAME};
use crate::storage::slug::{dedup_key, title_slug};
use crate::storage::traits::{ContentStore, StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Content repository for one source
///
/// Owns a single directory. Articles are de-duplicated by title only: a
/// second article whose title slug is already indexed is discarded, whatever
/// its content. Index changes stay in memory until [`Repository::dump_index`].
#[derive(Debug)]
pub struct Repository {
    root: PathBuf,
    index_path: PathBuf,
    index: RepositoryIndex,
}

impl Repository {
    /// Opens a repository, creating its directory when needed
    ///
    /// The index is loaded from `index.json` if present, otherwise empty. A
    /// scratch file left by an interrupted flush is removed.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;

        let index_path = root.join(INDEX_FILE_NAME);
        RepositoryIndex::remove_stale_tmp(&index_path);
        let index = RepositoryIndex::load(&index_path);
        tracing::debug!(
            "Opened repository {} with {} indexed articles",
            root.display(),
            index.len()
        );

        Ok(Self {
            root,
            index_path,
            index,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &RepositoryIndex {
        &self.index
    }

    /// See [`ContentStore::store_article`]
    pub fn store_article(&mut self, title: &str, content: &str) -> StorageResult<bool> {
        if title.trim().is_empty() {
            return Ok(false);
        }

        let slug = title_slug(title);

        if content.trim().is_empty() {
            return Ok(false);
        }

        let key = dedup_key(&slug);
        if self.index.contains(&key) {
            tracing::debug!("Skipping duplicate article '{}'", slug);
            return Ok(false);
        }

        let file_path = self.root.join(&slug);
        std::fs::write(&file_path, content).map_err(|e| StorageError::io(&file_path, e))?;
        self.index.insert(key, chrono::Utc::now().timestamp());

        Ok(true)
    }

    /// See [`ContentStore::dump_index`]
    pub fn dump_index(&self) -> StorageResult<()> {
        self.index.save(&self.index_path)
    }
}

impl ContentStore for Repository {
    fn store_article(&mut self, title: &str, content: &str) -> StorageResult<bool> {
        Repository::store_article(self, title, content)
    }

    fn dump_index(&self) -> StorageResult<()> {
        Repository::dump_index(self)
    }

    fn article_count(&self) -> usize {
        self.index.len()
    }
}
