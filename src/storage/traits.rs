//! Storage traits and error types
//!
//! This module defines the trait interface for persistence backends and
//! associated error types.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting a resource
///
/// None of these stop the crawl; the worker logs them and moves on.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Invalid relative path: {0}")]
    InvalidPath(String),

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for saved resources
///
/// Implementations must be safe to call from many workers at once.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Persists a body under a `/`-separated path relative to the sink root
    ///
    /// # Arguments
    ///
    /// * `relative_path` - Host-first path as produced by [`super::save_path`]
    /// * `body` - Raw response bytes
    async fn save(&self, relative_path: &str, body: &[u8]) -> SinkResult<()>;
}
