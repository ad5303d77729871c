//! Output module for crawl reporting
//!
//! Collects per-crawl counters and prints the end-of-crawl summary.

mod stats;

pub use stats::{print_statistics, CrawlCounters, CrawlStatistics};
