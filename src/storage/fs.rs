use crate::storage::traits::{Sink, SinkError, SinkResult};
use async_trait::async_trait;
use std::path::PathBuf;

/// Writes saved resources below a root directory
///
/// `example.com/dir/file.html` is written to `<root>/example.com/dir/file.html`,
/// creating intermediate directories as needed. An existing file is
/// overwritten.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a relative path onto the filesystem
    ///
    /// Empty segments are skipped. `.` and `..` segments are rejected so a
    /// crafted path cannot escape the root.
    pub fn resolve(&self, relative_path: &str) -> SinkResult<PathBuf> {
        let mut path = self.root.clone();
        let mut segments = 0;

        for segment in relative_path.split('/') {
            match segment {
                "" => continue,
                "." | ".." => return Err(SinkError::InvalidPath(relative_path.to_string())),
                segment => {
                    path.push(segment);
                    segments += 1;
                }
            }
        }

        if segments == 0 {
            return Err(SinkError::InvalidPath(relative_path.to_string()));
        }

        Ok(path)
    }
}

#[async_trait]
impl Sink for FsSink {
    async fn save(&self, relative_path: &str, body: &[u8]) -> SinkResult<()> {
        let path = self.resolve(relative_path)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SinkError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, body)
            .await
            .map_err(|source| SinkError::Write { path, source })
    }
}
