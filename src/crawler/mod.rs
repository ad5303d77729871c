//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The deduplicating frontier and its termination protocol
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML parsing and link extraction
//! - The worker pool that ties them together

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{CompletionGuard, Frontier, FrontierSnapshot};
pub use parser::{extract_links, LinkExtractor};
