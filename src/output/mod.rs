//! Output module for harvest results
//!
//! Each source job produces a [`JobReport`]; the orchestrator collects them
//! into a [`RunSummary`] that the CLI prints at the end of a run.

mod stats;

pub use stats::{print_summary, RunSummary};

use url::Url;

/// How a source job ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job ran to the end (individual links may still have failed)
    Completed,
    /// The job was aborted; it counts as zero stored articles
    Failed(String),
}

/// Per-source counters for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub category: String,
    pub url: Url,

    /// Distinct candidate URLs found by link discovery
    pub links_found: usize,

    /// Articles newly written to the repository
    pub stored: usize,

    /// Articles skipped because their title was already indexed
    pub duplicates: usize,

    /// Pages fetched that did not yield a complete article
    pub misses: usize,

    /// Article pages that could not be fetched
    pub fetch_failures: usize,

    /// Article or index writes that failed
    pub write_failures: usize,

    pub outcome: JobOutcome,
}

impl JobReport {
    /// Creates an empty, completed report for a source
    pub fn new(category: impl Into<String>, url: Url) -> Self {
        Self {
            category: category.into(),
            url,
            links_found: 0,
            stored: 0,
            duplicates: 0,
            misses: 0,
            fetch_failures: 0,
            write_failures: 0,
            outcome: JobOutcome::Completed,
        }
    }

    /// Creates the report of a job that was aborted
    pub fn failed(category: impl Into<String>, url: Url, reason: impl Into<String>) -> Self {
        Self {
            outcome: JobOutcome::Failed(reason.into()),
            ..Self::new(category, url)
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, JobOutcome::Failed(_))
    }
}
