use crate::storage::traits::{Sink, SinkResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Keeps saved resources in memory, keyed by relative path
///
/// Useful when embedding the crawler or when the saved bytes are consumed
/// directly instead of being written to disk.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the body saved under `relative_path`
    pub fn get(&self, relative_path: &str) -> Option<Vec<u8>> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(relative_path)
            .cloned()
    }

    /// Returns every saved path in sorted order
    pub fn paths(&self) -> Vec<String> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn save(&self, relative_path: &str, body: &[u8]) -> SinkResult<()> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(relative_path.to_string(), body.to_vec());
        Ok(())
    }
}
