//! Storage module for harvested content
//!
//! Each source owns one directory `<root>/<category>/<source-slug>/` holding
//! one plain-text file per article (named by the slug of its title) and an
//! `index.json` dedup index. The index is kept in memory while a job runs
//! and written back once, when the job ends.

mod index;
mod repository;
mod slug;
mod traits;

pub use index::{RepositoryIndex, INDEX_FILE_NAME, INDEX_TMP_FILE_NAME};
pub use repository::Repository;
pub use slug::{dedup_key, slugify, title_slug, MAX_SLUG_BYTES};
pub use traits::{ContentStore, StorageError, StorageResult};
