//! Gleaner main entry point
//!
//! This is the command-line interface for the Gleaner site crawler.

use anyhow::Context;
use clap::Parser;
use gleaner::config::{parse_config_with_hash, validate, Config};
use gleaner::crawler::{Coordinator, LinkExtractor};
use gleaner::output::print_statistics;
use gleaner::{ConfigError, GleanerError, Policy};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Gleaner: a concurrent site crawler and resource harvester
///
/// Gleaner starts from one or more seed URLs, follows the links it finds in
/// HTML pages, and optionally saves every resource whose path matches the
/// save patterns below the output directory.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "A concurrent site crawler and resource harvester", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (repeatable)
    #[arg(short, long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Regex a full URL must match to be crawled
    #[arg(long, value_name = "RE")]
    crawl_include: Option<String>,

    /// Regex that excludes a full URL from crawling
    #[arg(long, value_name = "RE")]
    crawl_exclude: Option<String>,

    /// Regex a URL path must match to be saved
    #[arg(long, value_name = "RE")]
    save_include: Option<String>,

    /// Regex that excludes a URL path from saving
    #[arg(long, value_name = "RE")]
    save_exclude: Option<String>,

    /// Regex the file extension must match to be saved
    #[arg(long, value_name = "RE")]
    save_extension: Option<String>,

    /// Directory saved resources are written below
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Save matching resources to the output directory
    #[arg(short, long)]
    save: bool,

    /// Number of concurrent workers
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if !self.urls.is_empty() {
            config.seeds = self.urls.clone();
        }
        if let Some(pattern) = &self.crawl_include {
            config.crawl.include = pattern.clone();
        }
        if let Some(pattern) = &self.crawl_exclude {
            config.crawl.exclude = Some(pattern.clone());
        }
        if let Some(pattern) = &self.save_include {
            config.save.include = pattern.clone();
        }
        if let Some(pattern) = &self.save_exclude {
            config.save.exclude = Some(pattern.clone());
        }
        if let Some(pattern) = &self.save_extension {
            config.save.extension = pattern.clone();
        }
        if let Some(directory) = &self.output {
            config.output.directory = directory.clone();
        }
        if self.save {
            config.save.enabled = true;
        }
        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Maps a startup failure onto the process exit status
///
/// Missing seeds and invalid settings exit with 2; anything else,
/// such as an unreadable config file or HTTP client failure, exits with 1.
fn exit_code_for(error: &anyhow::Error) -> u8 {
    let config_error = error.chain().find_map(|cause| {
        cause
            .downcast_ref::<ConfigError>()
            .or_else(|| match cause.downcast_ref::<GleanerError>() {
                Some(GleanerError::Config(e)) => Some(e),
                _ => None,
            })
    });

    match config_error {
        Some(ConfigError::Io(_)) | None => 1,
        Some(_) => 2,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = parse_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config)?;

    if cli.dry_run {
        let policy = Policy::from_config(&config)?;
        print_dry_run(&config, &policy, &LinkExtractor::from_config(&config));
        return Ok(());
    }

    tracing::info!(
        "Crawling {} seed URLs with {} workers",
        config.seeds.len(),
        config.crawler.workers
    );
    if config.save.enabled {
        tracing::info!(
            "Saving matching resources below {}",
            config.output.directory.display()
        );
    }

    let coordinator = Coordinator::new(&config).context("failed to start crawler")?;
    let stats = coordinator.run().await;

    if !cli.quiet {
        println!();
        print_statistics(&stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
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

/// Prints the resolved configuration for --dry-run
///
/// Patterns are printed from the compiled policy, so what is shown is what
/// the crawl would use.
fn print_dry_run(config: &Config, policy: &Policy, extractor: &LinkExtractor) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Seeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\nCrawler:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Queue capacity: {}", config.crawler.queue_capacity);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  User agent: {}", config.crawler.user_agent);

    let crawl = policy.crawl_matcher();
    println!("\nCrawl filter:");
    println!("  Include: {}", crawl.include());
    println!("  Exclude: {}", crawl.exclude().unwrap_or("(none)"));

    let save = policy.save_matcher();
    println!("\nSave:");
    println!("  Enabled: {}", policy.save_enabled());
    println!("  Include: {}", save.include());
    println!("  Exclude: {}", save.exclude().unwrap_or("(none)"));
    println!("  Extension: {}", policy.extension_pattern());
    println!("  Output directory: {}", config.output.directory.display());

    println!("\nExtract targets ({}):", extractor.targets().len());
    for target in extractor.targets() {
        println!("  - <{}> {}", target.tag, target.attribute);
    }

    println!("\n✓ Configuration is valid");
}
