//! Configuration module for Gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The binary layers command-line flags over the parsed file before validating.
//!
//! # Example
//!
//! ```no_run
//! use gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! println!("Crawling with {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlFilterConfig, CrawlerConfig, ExtractTarget, OutputConfig, SaveConfig,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config, parse_config_with_hash};
pub use validation::validate;
