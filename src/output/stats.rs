//! Run summary generation and display

use crate::catalog::RowRejection;
use crate::output::{JobOutcome, JobReport};

/// Result of a whole harvest run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// One report per scheduled source
    pub jobs: Vec<JobReport>,

    /// Catalog rows that were never scheduled
    pub rejected: Vec<RowRejection>,
}

impl RunSummary {
    pub fn new(mut jobs: Vec<JobReport>, rejected: Vec<RowRejection>) -> Self {
        // Jobs finish in any order; sort for stable display
        jobs.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.url.as_str().cmp(b.url.as_str()))
        });
        Self { jobs, rejected }
    }

    /// Total articles stored across all jobs
    pub fn total_stored(&self) -> usize {
        self.jobs.iter().map(|job| job.stored).sum()
    }

    pub fn completed_jobs(&self) -> usize {
        self.jobs.iter().filter(|job| !job.is_failed()).count()
    }

    pub fn failed_jobs(&self) -> usize {
        self.jobs.iter().filter(|job| job.is_failed()).count()
    }
}

/// Prints the run summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Overview:");
    println!(
        "  Sources: {} completed, {} failed, {} rejected",
        summary.completed_jobs(),
        summary.failed_jobs(),
        summary.rejected.len()
    );
    println!("  Articles stored: {}", summary.total_stored());
    println!();

    if !summary.jobs.is_empty() {
        println!("Sources:");
        for job in &summary.jobs {
            match &job.outcome {
                JobOutcome::Completed => println!(
                    "  [{}] {}: {} links, {} stored, {} duplicates, {} misses, {} fetch failures, {} write failures",
                    job.category,
                    job.url,
                    job.links_found,
                    job.stored,
                    job.duplicates,
                    job.misses,
                    job.fetch_failures,
                    job.write_failures
                ),
                JobOutcome::Failed(reason) => {
                    println!("  [{}] {}: FAILED ({})", job.category, job.url, reason)
                }
            }
        }
        println!();
    }

    if !summary.rejected.is_empty() {
        println!("Rejected catalog rows:");
        for rejection in &summary.rejected {
            println!("  line {}: {}", rejection.line, rejection.reason);
        }
        println!();
    }
}
