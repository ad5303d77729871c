//! Crawl and save policy
//!
//! Two independent decisions are made for every URL:
//!
//! - **crawl**: the full URL matches the crawl include pattern and not the
//!   crawl exclude pattern
//! - **save**: saving is enabled, the URL path matches the save include
//!   pattern and not the save exclude pattern, and the path's extension
//!   matches the extension pattern
//!
//! A discovered link is admitted to the frontier when either holds, so a
//! resource that is only save-eligible is still fetched once.

mod matcher;

pub use matcher::{compile, Matcher};

use crate::config::Config;
use crate::url::extension;
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Compiled, immutable crawl/save policy
#[derive(Debug, Clone)]
pub struct Policy {
    crawl: Matcher,
    save: Matcher,
    save_enabled: bool,
    extension: Regex,
}

impl Policy {
    /// Compiles the policy from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Policy)` - Every pattern compiled
    /// * `Err(ConfigError::InvalidPattern)` - A pattern failed to compile
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let crawl = Matcher::new(
            &config.crawl.include,
            config.crawl.exclude.as_deref(),
            "crawl.include",
            "crawl.exclude",
        )?;
        let save = Matcher::new(
            &config.save.include,
            config.save.exclude.as_deref(),
            "save.include",
            "save.exclude",
        )?;
        let extension = compile(&config.save.extension, "save.extension")?;

        Ok(Self {
            crawl,
            save,
            save_enabled: config.save.enabled,
            extension,
        })
    }

    /// Decides whether a URL should be followed, given its full string form
    pub fn should_crawl(&self, url: &str) -> bool {
        self.crawl.matches(url)
    }

    /// Decides whether a resource should be persisted, given its URL path
    pub fn should_save(&self, path: &str) -> bool {
        self.save_enabled && self.save.matches(path) && self.extension.is_match(extension(path))
    }

    /// Decides whether a discovered link enters the frontier
    pub fn should_admit(&self, url: &Url) -> bool {
        self.should_crawl(url.as_str()) || self.should_save(url.path())
    }

    pub fn save_enabled(&self) -> bool {
        self.save_enabled
    }

    pub fn crawl_matcher(&self) -> &Matcher {
        &self.crawl
    }

    pub fn save_matcher(&self) -> &Matcher {
        &self.save
    }

    pub fn extension_pattern(&self) -> &str {
        self.extension.as_str()
    }
}
