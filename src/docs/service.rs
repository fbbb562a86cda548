// Documentation service.
// Read-through access to the bundle, statistics and versions, each in its own cache slot.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{CacheSlot, Clock, DEFAULT_TTL};
use crate::error::{DocsError, Result};
use crate::github::ContentSource;

use super::assembler::{DEFAULT_PACKAGE_PATH, DocsAssembler};
use super::types::{DocsBundle, RepoStats, VersionInfo};

/// Number of releases offered by the version switcher.
pub const RELEASE_LIMIT: u32 = 10;

/// Validity window per cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub docs: Duration,
    pub stats: Duration,
    pub versions: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            docs: DEFAULT_TTL,
            stats: DEFAULT_TTL,
            versions: Duration::from_secs(60 * 60),
        }
    }
}

/// Which cache slot to invalidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    Docs,
    Stats,
    Versions,
}

/// Serves documentation content, refreshing from the source when stale.
///
/// Every accessor returns a value: after a failed refresh the last good value
/// is served, and a placeholder if there never was one.
pub struct DocsService {
    source: Arc<dyn ContentSource>,
    clock: Arc<dyn Clock>,
    assembler: DocsAssembler,
    docs: CacheSlot<DocsBundle>,
    stats: CacheSlot<RepoStats>,
    versions: CacheSlot<VersionInfo>,
}

impl DocsService {
    pub fn new(
        source: Arc<dyn ContentSource>,
        clock: Arc<dyn Clock>,
        package_path: impl Into<String>,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            assembler: DocsAssembler::new(source.clone(), clock.clone(), package_path),
            docs: CacheSlot::new("docs", ttls.docs, clock.clone()),
            stats: CacheSlot::new("stats", ttls.stats, clock.clone()),
            versions: CacheSlot::new("versions", ttls.versions, clock.clone()),
            source,
            clock,
        }
    }

    /// Service for the default package path and windows.
    pub fn with_defaults(source: Arc<dyn ContentSource>, clock: Arc<dyn Clock>) -> Self {
        Self::new(source, clock, DEFAULT_PACKAGE_PATH, CacheTtls::default())
    }

    /// The documentation bundle.
    pub async fn documentation(&self) -> DocsBundle {
        self.docs
            .get_or_refresh(
                || self.refresh_docs(),
                || DocsBundle::placeholder(self.clock.now()),
            )
            .await
    }

    /// Repository statistics.
    pub async fn repo_stats(&self) -> RepoStats {
        self.stats
            .get_or_refresh(
                || self.refresh_stats(),
                || RepoStats::placeholder(self.clock.now()),
            )
            .await
    }

    /// Released versions, newest first.
    pub async fn versions(&self) -> VersionInfo {
        self.versions
            .get_or_refresh(|| self.refresh_versions(), VersionInfo::default)
            .await
    }

    /// Drop one cached value so the next read refreshes it.
    pub async fn invalidate(&self, key: CacheKey) {
        match key {
            CacheKey::Docs => self.docs.invalidate().await,
            CacheKey::Stats => self.stats.invalidate().await,
            CacheKey::Versions => self.versions.invalidate().await,
        }
        info!(?key, "cache invalidated");
    }

    /// Drop every cached value.
    pub async fn clear_cache(&self) {
        for key in [CacheKey::Docs, CacheKey::Stats, CacheKey::Versions] {
            self.invalidate(key).await;
        }
    }

    async fn refresh_docs(&self) -> Result<DocsBundle> {
        info!("fetching documentation from GitHub");
        let assembly = self.assembler.assemble().await;
        if assembly.all_failed() {
            return Err(DocsError::UpstreamUnavailable);
        }
        Ok(assembly.bundle)
    }

    async fn refresh_stats(&self) -> Result<RepoStats> {
        let metadata = self.source.fetch_repo_metadata().await?;
        Ok(RepoStats::from(metadata))
    }

    async fn refresh_versions(&self) -> Result<VersionInfo> {
        let releases = self.source.fetch_releases(RELEASE_LIMIT).await?;
        Ok(VersionInfo::from_tags(
            releases.iter().map(|release| release.tag_name.as_str()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SlotState;
    use crate::cache::clock::ManualClock;
    use crate::docs::types::Section;
    use crate::github::MockContentSource;
    use crate::testutil::{FakeSource, metadata};
    use serde_json::json;

    fn service(source: Arc<dyn ContentSource>, clock: &Arc<ManualClock>) -> DocsService {
        DocsService::with_defaults(source, clock.clone())
    }

    fn docs_source() -> FakeSource {
        FakeSource::new()
            .with_file("simple-authx/README.md", "# readme")
            .with_file("simple-authx/CHANGELOG.md", "# changelog")
            .with_file("SECURITY.md", "# security")
            .with_releases(&["v3.1.0", "3.0.0"])
            .with_metadata(metadata(42))
    }

    #[tokio::test]
    async fn test_docs_fetched_once_within_window() {
        let mut mock = MockContentSource::new();
        // package.json plus five documents
        mock.expect_fetch_file()
            .times(6)
            .returning(|path| Ok(format!("contents of {}", path)));
        mock.expect_fetch_directory()
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let clock = Arc::new(ManualClock::epoch());
        let service = service(Arc::new(mock), &clock);

        let first = service.documentation().await;
        for _ in 0..4 {
            clock.advance(Duration::from_secs(60));
            assert_eq!(service.documentation().await, first);
        }
        assert_eq!(first.readme, "contents of simple-authx/README.md");
    }

    #[tokio::test]
    async fn test_stats_fetched_once_within_window() {
        let mut mock = MockContentSource::new();
        mock.expect_fetch_repo_metadata()
            .times(1)
            .returning(|| Ok(metadata(42)));

        let clock = Arc::new(ManualClock::epoch());
        let service = service(Arc::new(mock), &clock);

        let first = service.repo_stats().await;
        assert_eq!(service.repo_stats().await, first);
        assert_eq!(service.repo_stats().await, first);
    }

    #[tokio::test]
    async fn test_stats_mapping() {
        let clock = Arc::new(ManualClock::epoch());
        let service = service(Arc::new(docs_source()), &clock);

        let stats = service.repo_stats().await;
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({
                "stars": 42,
                "forks": 7,
                "watchers": 3,
                "openIssues": 1,
                "language": "TypeScript",
                "updatedAt": "2025-01-01T00:00:00Z"
            })
        );
    }

    #[tokio::test]
    async fn test_refresh_after_window() {
        let clock = Arc::new(ManualClock::epoch());
        let source = Arc::new(docs_source());
        let service = service(source.clone(), &clock);

        service.repo_stats().await;
        assert_eq!(source.calls(), 1);

        clock.advance(DEFAULT_TTL);
        service.repo_stats().await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_docs_stale_fallback() {
        let clock = Arc::new(ManualClock::epoch());
        let source = Arc::new(docs_source());
        let service = service(source.clone(), &clock);

        let good = service.documentation().await;
        clock.advance(Duration::from_secs(3600));
        source.set_down(true);

        let served = service.documentation().await;
        assert_eq!(served, good);
        assert_eq!(service.docs.state().await, SlotState::Stale);
    }

    #[tokio::test]
    async fn test_docs_placeholder_without_prior_success() {
        let clock = Arc::new(ManualClock::epoch());
        let source = Arc::new(docs_source());
        source.set_down(true);
        let service = service(source, &clock);

        let served = service.documentation().await;
        assert_eq!(served, DocsBundle::placeholder(clock.now()));
    }

    #[tokio::test]
    async fn test_partial_failure_is_cached_as_fresh() {
        let clock = Arc::new(ManualClock::epoch());
        let source = Arc::new(docs_source().failing("SECURITY.md"));
        let service = service(source, &clock);

        let bundle = service.documentation().await;
        assert_eq!(bundle.readme, "# readme");
        assert_eq!(bundle.security, Section::Security.unavailable_text());
        assert_eq!(service.docs.state().await, SlotState::Fresh);
    }

    #[tokio::test]
    async fn test_stats_stale_and_placeholder() {
        let clock = Arc::new(ManualClock::epoch());
        let source = Arc::new(docs_source());
        source.set_down(true);
        let service = service(source.clone(), &clock);

        assert_eq!(
            service.repo_stats().await,
            RepoStats::placeholder(clock.now())
        );

        source.set_down(false);
        let good = service.repo_stats().await;
        assert_eq!(good.stars, 42);

        clock.advance(Duration::from_secs(600));
        source.set_down(true);
        assert_eq!(service.repo_stats().await, good);
    }

    #[tokio::test]
    async fn test_versions_are_idempotent_within_window() {
        let mut mock = MockContentSource::new();
        mock.expect_fetch_releases()
            .withf(|limit| *limit == RELEASE_LIMIT)
            .times(1)
            .returning(|_| {
                Ok(serde_json::from_value(json!([
                    {"id": 3, "tag_name": "v3.1.0"},
                    {"id": 2, "tag_name": "3.0.0"},
                    {"id": 1, "tag_name": "v2.0.6"}
                ]))
                .unwrap())
            });

        let clock = Arc::new(ManualClock::epoch());
        let service = service(Arc::new(mock), &clock);

        let first = service.versions().await;
        let second = service.versions().await;
        assert_eq!(first, second);
        assert_eq!(first.current, "3.1.0");
        assert_eq!(first.versions, vec!["3.1.0", "3.0.0", "2.0.6"]);
    }

    #[tokio::test]
    async fn test_versions_default_on_failure() {
        let clock = Arc::new(ManualClock::epoch());
        let source = Arc::new(docs_source());
        source.set_down(true);
        let service = service(source, &clock);

        assert_eq!(
            service.versions().await,
            VersionInfo {
                current: "2.0.6".to_string(),
                versions: vec!["2.0.6".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refresh() {
        let clock = Arc::new(ManualClock::epoch());
        let source = Arc::new(docs_source());
        let service = service(source.clone(), &clock);

        service.repo_stats().await;
        service.versions().await;
        let before = source.calls();

        service.clear_cache().await;
        assert_eq!(service.stats.state().await, SlotState::Empty);
        assert_eq!(service.versions.state().await, SlotState::Empty);
        assert_eq!(service.docs.state().await, SlotState::Empty);

        service.repo_stats().await;
        service.versions().await;
        assert_eq!(source.calls(), before + 2);
    }

    #[tokio::test]
    async fn test_invalidate_single_slot() {
        let clock = Arc::new(ManualClock::epoch());
        let service = service(Arc::new(docs_source()), &clock);

        service.repo_stats().await;
        service.versions().await;
        service.invalidate(CacheKey::Stats).await;

        assert_eq!(service.stats.state().await, SlotState::Empty);
        assert_eq!(service.versions.state().await, SlotState::Fresh);
    }
}
