//! Crawler coordinator - worker pool orchestration
//!
//! This module seeds the frontier and runs a fixed pool of workers against
//! it. Each worker repeatedly:
//! - Takes the next URL from the frontier
//! - Fetches it
//! - Extracts links from HTML bodies and submits the admissible ones
//! - Saves the body if the save policy matches
//! - Marks the URL complete
//!
//! The crawl ends when the frontier drains and every worker has exited.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::LinkExtractor;
use crate::output::{CrawlCounters, CrawlStatistics};
use crate::policy::Policy;
use crate::storage::{save_path, FsSink, Sink};
use crate::{ConfigError, GleanerError};
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    seeds: Vec<Url>,
    policy: Arc<Policy>,
    extractor: Arc<LinkExtractor>,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn Sink>,
    workers: usize,
    queue_capacity: usize,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP and saves to disk
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the client was built
    /// * `Err(GleanerError)` - Invalid configuration or HTTP client failure
    pub fn new(config: &Config) -> Result<Self, GleanerError> {
        let fetcher = HttpFetcher::new(&config.crawler)?;
        let sink = FsSink::new(config.output.directory.clone());
        Ok(Self::with_components(
            config,
            Arc::new(fetcher),
            Arc::new(sink),
        )?)
    }

    /// Creates a coordinator around caller-supplied fetcher and sink
    pub fn with_components(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn Sink>,
    ) -> Result<Self, ConfigError> {
        validate(config)?;

        Ok(Self {
            seeds: config.seed_urls()?,
            policy: Arc::new(Policy::from_config(config)?),
            extractor: Arc::new(LinkExtractor::from_config(config)),
            fetcher,
            sink,
            workers: config.crawler.workers,
            queue_capacity: config.crawler.queue_capacity,
        })
    }

    /// Runs the crawl to completion
    ///
    /// Seeds are admitted without consulting the policy, then the workers
    /// are started. A worker that panics is replaced as long as the
    /// frontier still has work, so one bad page cannot stall the crawl.
    pub async fn run(&self) -> CrawlStatistics {
        let started_at = Utc::now();
        let counters = Arc::new(CrawlCounters::default());
        let frontier = Frontier::new(self.queue_capacity);

        // Every seed must be admitted before any worker can observe an
        // empty frontier
        for seed in &self.seeds {
            if frontier.submit(seed.clone()).await {
                counters.record_admitted();
                tracing::info!("Seed {}", seed);
            } else {
                counters.record_duplicate();
                tracing::debug!("Duplicate seed {} ignored", seed);
            }
        }

        let worker = Worker {
            frontier: frontier.clone(),
            policy: self.policy.clone(),
            extractor: self.extractor.clone(),
            fetcher: self.fetcher.clone(),
            sink: self.sink.clone(),
            counters: counters.clone(),
        };

        let mut pool = JoinSet::new();
        for id in 0..self.workers {
            pool.spawn(worker.clone().run(id));
        }
        tracing::info!("Started {} workers", self.workers);

        let mut next_id = self.workers;
        while let Some(result) = pool.join_next().await {
            let Err(e) = result else {
                continue;
            };

            tracing::error!("Worker task failed: {}", e);
            if e.is_panic() && !frontier.snapshot().await.closed {
                tracing::warn!("Replacing failed worker with worker {}", next_id);
                pool.spawn(worker.clone().run(next_id));
                next_id += 1;
            }
        }

        let stats = counters.snapshot(started_at, Utc::now());
        tracing::info!(
            "Crawl completed: {} pages fetched, {} failed, {} saved in {:.2}s",
            stats.pages_fetched,
            stats.fetch_failures,
            stats.files_saved,
            stats.duration().num_milliseconds() as f64 / 1000.0
        );
        stats
    }
}

/// State cloned into every worker task
#[derive(Clone)]
struct Worker {
    frontier: Frontier,
    policy: Arc<Policy>,
    extractor: Arc<LinkExtractor>,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn Sink>,
    counters: Arc<CrawlCounters>,
}

impl Worker {
    async fn run(self, id: usize) {
        tracing::trace!("Worker {} started", id);

        while let Some(url) = self.frontier.next().await {
            let guard = self.frontier.completion_guard();
            self.process(&url).await;
            guard.complete().await;
        }

        tracing::trace!("Worker {} exiting, frontier drained", id);
    }

    /// Processes a single URL
    ///
    /// Every discovered link is submitted (and the submission awaited)
    /// before this returns, so the caller may complete the task afterwards.
    async fn process(&self, url: &Url) {
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                self.counters.record_fetch_failure();
                tracing::debug!("Fetch failed for {}: {}", url, e);
                return;
            }
        };

        self.counters.record_fetched();
        tracing::info!("Crawled {}", url);

        if page.is_html() {
            let links = self
                .extractor
                .extract_from_bytes(&page.body, &page.final_url);
            self.counters.record_links(links.len());

            for link in links {
                if !self.policy.should_admit(&link) {
                    tracing::trace!("Filtered out {}", link);
                    continue;
                }

                if self.frontier.submit(link.clone()).await {
                    self.counters.record_admitted();
                    tracing::debug!("New link {}", link);
                } else {
                    self.counters.record_duplicate();
                }
            }
        }

        if self.policy.should_save(url.path()) {
            self.save(url, &page.body).await;
        }
    }

    async fn save(&self, url: &Url, body: &[u8]) {
        let Some(relative_path) = save_path(url) else {
            self.counters.record_save_failure();
            tracing::warn!("Cannot derive a save path for {}", url);
            return;
        };

        match self.sink.save(&relative_path, body).await {
            Ok(()) => {
                self.counters.record_saved();
                tracing::debug!("Saved {} as {}", url, relative_path);
            }
            Err(e) => {
                self.counters.record_save_failure();
                tracing::warn!("Failed to save {}: {}", url, e);
            }
        }
    }
}

/// Runs a complete crawl over HTTP, saving to the configured directory
///
/// # Example
///
/// ```no_run
/// use gleaner::config::load_config;
/// use gleaner::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("gleaner.toml"))?;
/// let stats = run_crawl(&config).await?;
/// println!("{} pages fetched", stats.pages_fetched);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlStatistics, GleanerError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
