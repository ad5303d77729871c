//! Crawl statistics
//!
//! Workers bump shared atomic counters while they run; the coordinator turns
//! them into a [`CrawlStatistics`] snapshot once the frontier drains.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Pages fetched successfully
    pub pages_fetched: u64,

    /// Fetches that failed (transport error or non-success status)
    pub fetch_failures: u64,

    /// Links extracted from fetched pages, before filtering and dedup
    pub links_discovered: u64,

    /// URLs admitted to the frontier, seeds included
    pub urls_admitted: u64,

    /// Admissible URLs rejected because they were already seen
    pub duplicates_skipped: u64,

    /// Resources written to the sink
    pub files_saved: u64,

    /// Resources the sink failed to write
    pub save_failures: u64,
}

impl CrawlStatistics {
    /// Tasks that ran to completion, successful or not
    pub fn tasks_completed(&self) -> u64 {
        self.pages_fetched + self.fetch_failures
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Counters shared by all workers of one crawl
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    links_discovered: AtomicU64,
    urls_admitted: AtomicU64,
    duplicates_skipped: AtomicU64,
    files_saved: AtomicU64,
    save_failures: AtomicU64,
}

impl CrawlCounters {
    pub fn record_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_links(&self, count: usize) {
        self.links_discovered
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_admitted(&self) {
        self.urls_admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved(&self) {
        self.files_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save_failure(&self) {
        self.save_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Captures the counters into a statistics summary
    pub fn snapshot(&self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> CrawlStatistics {
        CrawlStatistics {
            started_at,
            finished_at,
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            links_discovered: self.links_discovered.load(Ordering::Relaxed),
            urls_admitted: self.urls_admitted.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            files_saved: self.files_saved.load(Ordering::Relaxed),
            save_failures: self.save_failures.load(Ordering::Relaxed),
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Finished: {}", stats.finished_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  Duration: {:.2}s",
        stats.duration().num_milliseconds() as f64 / 1000.0
    );
    println!();

    println!("Frontier:");
    println!("  URLs admitted: {}", stats.urls_admitted);
    println!("  Duplicates skipped: {}", stats.duplicates_skipped);
    println!("  Links discovered: {}", stats.links_discovered);
    println!();

    println!("Fetching:");
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!();

    println!("Saving:");
    println!("  Files saved: {}", stats.files_saved);
    println!("  Save failures: {}", stats.save_failures);
    println!();

    let completed = stats.tasks_completed();
    let success_rate = if completed > 0 {
        (stats.pages_fetched as f64 / completed as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} URLs fetched successfully)",
        success_rate, stats.pages_fetched, completed
    );
}
