use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

/// Number of concurrent workers when none is configured
pub const DEFAULT_WORKERS: usize = 20;

/// Capacity of the frontier mailbox when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Per-request timeout in seconds when none is configured
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for Gleaner
///
/// Built once at startup (from an optional TOML file plus command-line
/// overrides) and never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URLs the crawl starts from
    #[serde(default)]
    pub seeds: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub crawl: CrawlFilterConfig,

    #[serde(default)]
    pub save: SaveConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Element/attribute pairs scanned for links
    #[serde(default = "default_extract_targets")]
    pub extract: Vec<ExtractTarget>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            crawler: CrawlerConfig::default(),
            crawl: CrawlFilterConfig::default(),
            save: SaveConfig::default(),
            output: OutputConfig::default(),
            extract: default_extract_targets(),
        }
    }
}

impl Config {
    /// Parses every seed into an absolute HTTP(S) URL
    pub fn seed_urls(&self) -> ConfigResult<Vec<Url>> {
        self.seeds
            .iter()
            .map(|seed| {
                let url = Url::parse(seed).map_err(|e| {
                    ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e))
                })?;

                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(ConfigError::InvalidUrl(format!(
                        "Seed URL '{}' must use the http or https scheme",
                        seed
                    )));
                }

                Ok(url)
            })
            .collect()
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Number of frontier commands that may be pending before submitters wait
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: usize,

    /// Timeout for a single HTTP request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: format!("gleaner/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Which URLs are followed, matched against the full URL
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlFilterConfig {
    pub include: String,
    pub exclude: Option<String>,
}

impl Default for CrawlFilterConfig {
    fn default() -> Self {
        Self {
            include: ".*".to_string(),
            exclude: None,
        }
    }
}

/// Which resources are persisted, matched against the URL path
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub enabled: bool,
    pub include: String,
    pub exclude: Option<String>,

    /// Matched against the text after the last `.` of the path
    pub extension: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            include: ".*".to_string(),
            exclude: None,
            extension: ".*".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory saved resources are written below
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
        }
    }
}

/// An element name and the attribute on it that holds a URL
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractTarget {
    pub tag: String,
    pub attribute: String,
}

impl ExtractTarget {
    pub fn new(tag: &str, attribute: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

fn default_extract_targets() -> Vec<ExtractTarget> {
    vec![ExtractTarget::new("a", "href"), ExtractTarget::new("img", "src")]
}
