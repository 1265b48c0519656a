//! Where raw comment payloads come from.
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// A producer of raw, untyped comment mappings for a video URL.
///
/// Implementations never fail: an unavailable source yields an empty list.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn fetch_comments(&self, url: &str, max_items: usize) -> Vec<Value>;
}

/// Recorded payloads keyed by video URL, used for offline and deterministic runs.
#[derive(Debug, Clone, Default)]
pub struct SampleComments {
    by_url: HashMap<String, Vec<Value>>,
}

impl SampleComments {
    pub fn new(by_url: HashMap<String, Vec<Value>>) -> Self {
        Self { by_url }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.by_url.contains_key(url)
    }
}

#[async_trait]
impl CommentSource for SampleComments {
    async fn fetch_comments(&self, url: &str, max_items: usize) -> Vec<Value> {
        self.by_url
            .get(url)
            .map(|items| items.iter().take(max_items).cloned().collect())
            .unwrap_or_default()
    }
}
