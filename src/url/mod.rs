//! URL handling module for Gleaner
//!
//! Reference resolution for extracted links, the host segment used to lay
//! out saved files, and the path extension consulted by the save policy.

mod domain;
mod path;
mod resolve;

pub use domain::host_segment;
pub use path::extension;
pub use resolve::{is_fetchable, resolve_reference};
