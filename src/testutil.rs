// Test helpers: an in-memory content source.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{DocsError, Result};
use crate::github::{ContentEntry, ContentSource, EntryKind, Release, RepoMetadata};

/// Content source backed by maps, with optional latency and failures.
#[derive(Default)]
pub struct FakeSource {
    files: HashMap<String, String>,
    directories: HashMap<String, Vec<ContentEntry>>,
    failing: HashSet<String>,
    releases: Vec<Release>,
    metadata: Option<RepoMetadata>,
    delay: Duration,
    down: AtomicBool,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_string(), text.to_string());
        self
    }

    pub fn with_directory(mut self, path: &str, entries: Vec<ContentEntry>) -> Self {
        self.directories.insert(path.to_string(), entries);
        self
    }

    /// Make requests for `path` fail.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn with_releases(mut self, tags: &[&str]) -> Self {
        self.releases = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| Release {
                id: i as u64,
                tag_name: tag.to_string(),
                name: None,
                draft: false,
                prerelease: false,
                published_at: None,
            })
            .collect();
        self
    }

    pub fn with_metadata(mut self, metadata: RepoMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Sleep this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every request fail while `down` is set.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn begin(&self, key: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.down.load(Ordering::SeqCst) || self.failing.contains(key) {
            return Err(DocsError::Status {
                status: 502,
                body: format!("{} unavailable", key),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn fetch_file(&self, path: &str) -> Result<String> {
        self.begin(path).await?;
        Ok(self.files.get(path).cloned().unwrap_or_default())
    }

    async fn fetch_directory(&self, path: &str) -> Result<Vec<ContentEntry>> {
        self.begin(path).await?;
        Ok(self.directories.get(path).cloned().unwrap_or_default())
    }

    async fn fetch_releases(&self, limit: u32) -> Result<Vec<Release>> {
        self.begin("releases").await?;
        let releases = self.releases.iter().take(limit as usize);
        Ok(releases.cloned().collect())
    }

    async fn fetch_repo_metadata(&self) -> Result<RepoMetadata> {
        self.begin("repo").await?;
        self.metadata.clone().ok_or(DocsError::Status {
            status: 404,
            body: "no repository".to_string(),
        })
    }
}

/// A directory listing entry.
pub fn entry(path: &str, kind: EntryKind) -> ContentEntry {
    ContentEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        kind,
        sha: String::new(),
        size: 0,
        html_url: None,
        download_url: None,
        content: None,
        encoding: None,
    }
}

/// Repository metadata as GitHub would report it.
pub fn metadata(stars: u64) -> RepoMetadata {
    serde_json::from_value(serde_json::json!({
        "stargazers_count": stars,
        "forks_count": 7,
        "subscribers_count": 3,
        "open_issues_count": 1,
        "language": "TypeScript",
        "updated_at": "2025-01-01T00:00:00Z"
    }))
    .unwrap()
}
