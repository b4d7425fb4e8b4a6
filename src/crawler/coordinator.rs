//! Crawl orchestration
//!
//! One job per configured source, fanned out across a fixed pool of worker
//! tasks. Jobs travel to workers over a queue channel and reports come back
//! over a second channel. Each job runs in its own spawned task, so an error
//! or a panic inside one job becomes a failed report for that source and
//! never reaches its siblings.
//!
//! Within a job everything is sequential: discover links, then fetch and
//! extract each link, store each article, and flush the index once.

use crate::catalog::{load_catalog, SourceSpec};
use crate::config::{to_header_map, Config};
use crate::crawler::article::Article;
use crate::crawler::discovery::discover_links;
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::FetchClient;
use crate::output::{JobReport, RunSummary};
use crate::storage::{slugify, ContentStore, Repository};
use crate::HarvestError;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use url::Url;

/// State shared read-only by every job
struct JobContext {
    client: FetchClient,
    root: PathBuf,
}

/// Runs harvest jobs over a bounded worker pool
pub struct Harvester {
    context: Arc<JobContext>,
    workers: usize,
}

impl Harvester {
    /// Creates a harvester from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = FetchClient::new(&config.http)?;
        Ok(Self::with_client(
            client,
            config.harvest.root.clone(),
            config.harvest.worker_count(),
        ))
    }

    /// Creates a harvester around an existing fetch client
    pub fn with_client(client: FetchClient, root: impl Into<PathBuf>, workers: usize) -> Self {
        Self {
            context: Arc::new(JobContext {
                client,
                root: root.into(),
            }),
            workers: workers.max(1),
        }
    }

    /// Size of the worker pool
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Harvests every source and returns one report per source
    ///
    /// Returns only after every job has finished, successfully or not.
    /// Reports arrive in completion order.
    pub async fn run(&self, sources: Vec<SourceSpec>) -> Vec<JobReport> {
        let total = sources.len();
        let workers = self.workers.min(total);
        tracing::info!("Harvesting {} sources with {} workers", total, workers);

        let (job_tx, job_rx) = mpsc::unbounded_channel();
        for source in sources {
            // The receiver is alive until the workers finish
            let _ = job_tx.send(source);
        }
        drop(job_tx);
        let job_rx = Arc::new(Mutex::new(job_rx));

        let (report_tx, mut report_rx) = mpsc::unbounded_channel();
        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            pool.spawn(worker_loop(
                worker_id,
                Arc::clone(&self.context),
                Arc::clone(&job_rx),
                report_tx.clone(),
            ));
        }
        drop(report_tx);

        let mut reports = Vec::with_capacity(total);
        while let Some(report) = report_rx.recv().await {
            reports.push(report);
        }

        while let Some(result) = pool.join_next().await {
            if let Err(e) = result {
                tracing::error!("Worker task ended abnormally: {}", e);
            }
        }

        reports
    }
}

/// Pulls jobs off the queue until it is drained
async fn worker_loop(
    worker_id: usize,
    context: Arc<JobContext>,
    jobs: Arc<Mutex<UnboundedReceiver<SourceSpec>>>,
    reports: UnboundedSender<JobReport>,
) {
    loop {
        let next = jobs.lock().await.recv().await;
        let Some(source) = next else {
            break;
        };

        tracing::debug!("Worker {} picked up {}", worker_id, source.url);
        let category = source.category.clone();
        let url = source.url.clone();
        let context = Arc::clone(&context);
        let job = async move { harvest_source(&context.client, &context.root, &source).await };

        let report = run_isolated(category, url, job).await;
        if reports.send(report).is_err() {
            break;
        }
    }
}

/// Runs one job in its own task and turns any failure into a report
///
/// A panic inside `job` surfaces as a `JoinError` and is reported as an
/// aborted job for `url`.
async fn run_isolated<F>(category: String, url: Url, job: F) -> JobReport
where
    F: Future<Output = Result<JobReport, HarvestError>> + Send + 'static,
{
    match tokio::spawn(job).await {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            tracing::error!("Job [{}] {} failed: {}", category, url, e);
            JobReport::failed(category, url, e.to_string())
        }
        Err(e) => {
            tracing::error!("Job [{}] {} aborted: {}", category, url, e);
            JobReport::failed(category, url, format!("job aborted: {}", e))
        }
    }
}

/// Directory owned by a source: `<root>/<category>/<slug(host[:port])>`
pub fn source_dir(root: &Path, source: &SourceSpec) -> Result<PathBuf, HarvestError> {
    let host = source
        .url
        .host_str()
        .ok_or_else(|| HarvestError::MissingHost(source.url.to_string()))?;

    let netloc = match source.url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Ok(root.join(&source.category).join(slugify(&netloc)))
}

/// Harvests a single source
///
/// Link fetch failures, extraction misses and failed article writes are
/// counted and skipped. Only setup failures (bad headers, unusable output
/// directory) abort the job.
pub async fn harvest_source(
    client: &FetchClient,
    root: &Path,
    source: &SourceSpec,
) -> Result<JobReport, HarvestError> {
    tracing::info!("Start harvesting [{}] {}", source.category, source.url);

    let headers = source.headers.as_ref().map(to_header_map).transpose()?;
    let mut repository = Repository::open(source_dir(root, source)?)?;
    let mut report = JobReport::new(source.category.as_str(), source.url.clone());

    let links = discover_links(
        client,
        &source.url,
        source.max_depth,
        source.link_class.as_deref(),
        headers.as_ref(),
    )
    .await;
    report.links_found = links.len();

    let rule = source.extraction_rule();
    for link in &links {
        match extract(client, link, &rule, headers.as_ref()).await {
            Ok(article) => store_extracted(&mut repository, link, article, &mut report),
            Err(e) if e.is_miss() => {
                tracing::debug!("No article at {}: {}", link, e);
                report.misses += 1;
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", link, e);
                report.fetch_failures += 1;
            }
        }
    }

    if let Err(e) = repository.dump_index() {
        tracing::warn!(
            "Failed to flush index of {}: {}",
            repository.root().display(),
            e
        );
        report.write_failures += 1;
    }

    tracing::info!(
        "Finished harvesting [{}] {}: {} links, {} stored, {} duplicates",
        source.category,
        source.url,
        report.links_found,
        report.stored,
        report.duplicates
    );

    Ok(report)
}

/// Stores one extracted article and records the result
fn store_extracted<S: ContentStore>(
    store: &mut S,
    link: &Url,
    article: Article,
    report: &mut JobReport,
) {
    let Some(article) = article.into_storable(link) else {
        report.misses += 1;
        return;
    };

    match store.store_article(&article.title, &article.content) {
        Ok(true) => report.stored += 1,
        Ok(false) => report.duplicates += 1,
        Err(e) => {
            tracing::warn!("Failed to store article from {}: {}", link, e);
            report.write_failures += 1;
        }
    }
}

/// Loads the source catalog and harvests every valid source
///
/// Rejected catalog rows are reported in the summary and never scheduled.
pub async fn run_harvest(config: &Config) -> Result<RunSummary, HarvestError> {
    let catalog = load_catalog(&config.harvest.sources)?;
    tracing::info!(
        "Loaded {} sources from {} ({} rows rejected)",
        catalog.sources.len(),
        config.harvest.sources.display(),
        catalog.rejected.len()
    );

    let harvester = Harvester::new(config)?;
    let reports = harvester.run(catalog.sources).await;

    Ok(RunSummary::new(reports, catalog.rejected))
}
