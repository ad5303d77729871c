use crate::config::types::{Config, CrawlerConfig, ExtractTarget};
use crate::policy::Policy;
use crate::ConfigError;

/// Largest worker pool accepted from configuration
const MAX_WORKERS: usize = 1000;

/// Validates the entire configuration
///
/// Seeds are checked first so a missing seed list is reported as
/// [`ConfigError::NoSeeds`] even when other values are also wrong.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.seeds.is_empty() {
        return Err(ConfigError::NoSeeds);
    }
    config.seed_urls()?;

    validate_crawler_config(&config.crawler)?;
    validate_extract_targets(&config.extract)?;

    if config.save.enabled && config.output.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty when saving is enabled".to_string(),
        ));
    }

    // Surfaces pattern errors at startup rather than on first use
    Policy::from_config(config)?;

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.queue_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "queue-capacity must be >= 1, got {}",
            config.queue_capacity
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the element/attribute pairs scanned for links
fn validate_extract_targets(targets: &[ExtractTarget]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one extract target is required".to_string(),
        ));
    }

    for target in targets {
        if target.tag.trim().is_empty() || target.attribute.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "extract target needs both a tag and an attribute, got '{}@{}'",
                target.tag, target.attribute
            )));
        }
    }

    Ok(())
}
