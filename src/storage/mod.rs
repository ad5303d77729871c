//! Storage module for persisting crawled resources
//!
//! This module handles everything on the save side of a crawl:
//! - The [`Sink`] trait the worker pool writes through
//! - Deriving a host-first relative path from a URL
//! - A filesystem sink and an in-memory sink

mod fs;
mod memory;
mod traits;

pub use fs::FsSink;
pub use memory::MemorySink;
pub use traits::{Sink, SinkError, SinkResult};

use crate::url::host_segment;
use url::Url;

/// Leaf name used for URLs whose path ends in `/`
///
/// `http://example.com/dir/` and `http://example.com/dir/file.html` would
/// otherwise need `dir` to be both a file and a directory.
pub const INDEX_LEAF: &str = "__index__";

/// Derives the relative save path for a URL
///
/// The layout is `<host>/<url path>`: runs of `/` are collapsed and a
/// trailing `/` is completed with [`INDEX_LEAF`]. The query and fragment are
/// not part of the path. Returns `None` for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gleaner::storage::save_path;
///
/// let url = Url::parse("http://example.com/dir/").unwrap();
/// assert_eq!(save_path(&url).unwrap(), "example.com/dir/__index__");
///
/// let url = Url::parse("http://example.com/dir/file.html").unwrap();
/// assert_eq!(save_path(&url).unwrap(), "example.com/dir/file.html");
/// ```
pub fn save_path(url: &Url) -> Option<String> {
    let host = host_segment(url)?;
    Some(relative_path(&host, url.path()))
}

/// Joins a host and a URL path into a collapsed relative path
pub fn relative_path(host: &str, path: &str) -> String {
    let joined = format!("{}/{}", host, path);
    let mut collapsed = String::with_capacity(joined.len() + INDEX_LEAF.len());

    let mut previous_was_separator = false;
    for c in joined.chars() {
        let is_separator = c == '/';
        if !(is_separator && previous_was_separator) {
            collapsed.push(c);
        }
        previous_was_separator = is_separator;
    }

    if collapsed.ends_with('/') {
        collapsed.push_str(INDEX_LEAF);
    }

    collapsed
}
