//! LinkMind main entry point
//!
//! This is the command-line interface for the LinkMind content harvester.

use anyhow::Context;
use clap::{Parser, Subcommand};
use linkmind::catalog::{load_catalog, parse_tag};
use linkmind::config::{load_config_with_hash, validate, Config};
use linkmind::crawler::{harvest, retrieve_content, ExtractionRule, FetchClient};
use linkmind::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// LinkMind: a concurrent content harvester
///
/// LinkMind reads a catalog of web sources, discovers article links on each
/// source's seed page, extracts the article text and stores it per category
/// and source for offline text classification.
#[derive(Parser, Debug)]
#[command(name = "linkmind")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent content harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Harvest every source of the catalog into the content store
    Scrape {
        /// The directory where harvested content is saved
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// The source catalog CSV file
        #[arg(short, long)]
        sources: Option<PathBuf>,

        /// Number of sources harvested concurrently
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Extract the article of a single URL and print it
    Retrieve {
        /// The page to extract
        url: Url,

        /// Tag name of the element holding the article
        #[arg(long, default_value = "body", value_parser = parse_tag_arg)]
        tag: String,

        /// Class the article element must carry
        #[arg(long)]
        class: Option<String>,
    },

    /// Validate config and catalog and show what would be harvested
    Check {
        /// The source catalog CSV file
        #[arg(short, long)]
        sources: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_ref())?;

    match cli.command {
        Command::Scrape {
            root,
            sources,
            workers,
        } => handle_scrape(config, root, sources, workers).await,
        Command::Retrieve { url, tag, class } => handle_retrieve(&config, url, tag, class).await,
        Command::Check { sources } => handle_check(config, sources),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkmind=info,warn"),
            1 => EnvFilter::new("linkmind=debug,info"),
            2 => EnvFilter::new("linkmind=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the `scrape` command: runs a full harvest
async fn handle_scrape(
    mut config: Config,
    root: Option<PathBuf>,
    sources: Option<PathBuf>,
    workers: Option<usize>,
) -> anyhow::Result<()> {
    if let Some(root) = root {
        config.harvest.root = root;
    }
    if let Some(sources) = sources {
        config.harvest.sources = sources;
    }
    if workers.is_some() {
        config.harvest.workers = workers;
    }
    validate(&config)?;

    tracing::info!(
        "Harvesting {} into {}",
        config.harvest.sources.display(),
        config.harvest.root.display()
    );

    let summary = harvest(&config).await?;
    print_summary(&summary);

    tracing::info!(
        "Harvest completed: {} articles stored, {} sources failed",
        summary.total_stored(),
        summary.failed_jobs()
    );

    Ok(())
}

/// Accepts a bare tag name for `retrieve --tag`
fn parse_tag_arg(value: &str) -> Result<String, String> {
    parse_tag(value).map_err(|e| e.to_string())
}

/// Handles the `retrieve` command: extracts a single page
async fn handle_retrieve(
    config: &Config,
    url: Url,
    tag: String,
    class: Option<String>,
) -> anyhow::Result<()> {
    let client = FetchClient::new(&config.http)?;

    let mut rule = ExtractionRule::new(tag);
    if let Some(class) = class {
        rule = rule.with_class(class);
    }

    let article = retrieve_content(&client, &url, &rule, None)
        .await
        .with_context(|| format!("cannot retrieve content from {}", url))?;

    println!("{}\n\n{}", article.title, article.content);

    Ok(())
}

/// Handles the `check` command: validates config and catalog
fn handle_check(mut config: Config, sources: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(sources) = sources {
        config.harvest.sources = sources;
    }
    validate(&config)?;

    println!("=== LinkMind Check ===\n");

    println!("Harvest Configuration:");
    println!("  Root: {}", config.harvest.root.display());
    println!("  Sources: {}", config.harvest.sources.display());
    println!("  Workers: {}", config.harvest.worker_count());

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    println!("  Default headers: {}", config.http.headers.len());

    let catalog = load_catalog(&config.harvest.sources).with_context(|| {
        format!(
            "failed to read source catalog {}",
            config.harvest.sources.display()
        )
    })?;

    println!("\nSources ({}):", catalog.sources.len());
    for source in &catalog.sources {
        println!(
            "  - [{}] {} (depth {}, <{}>)",
            source.category, source.url, source.max_depth, source.article_tag
        );
    }

    if !catalog.rejected.is_empty() {
        println!("\nRejected rows ({}):", catalog.rejected.len());
        for rejection in &catalog.rejected {
            println!("  - line {}: {}", rejection.line, rejection.reason);
        }
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would harvest {} sources",
        catalog.sources.len()
    );

    Ok(())
}
