// GitHub API endpoint functions.
// Typed access to the contents, releases and repository endpoints.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{DocsError, Result};

use super::client::GitHubClient;
use super::source::ContentSource;
use super::types::{ContentEntry, Release, RepoMetadata};

impl GitHubClient {
    /// Get a file's decoded text. Missing files and empty bodies yield `""`.
    pub async fn get_file(&self, path: &str) -> Result<String> {
        let endpoint = self.repo_endpoint(&format!("/contents/{}", path));
        let Some(entry) = self.get_json::<ContentEntry>(&endpoint, &[]).await? else {
            warn!(path, "file not found");
            return Ok(String::new());
        };

        match entry.content {
            Some(content) => (self.decode)(&content),
            None => {
                warn!(path, "no content in file");
                Ok(String::new())
            }
        }
    }

    /// Get a directory listing. Missing directories yield an empty list.
    pub async fn get_directory(&self, path: &str) -> Result<Vec<ContentEntry>> {
        let endpoint = self.repo_endpoint(&format!("/contents/{}", path));
        match self.get_json::<Vec<ContentEntry>>(&endpoint, &[]).await? {
            Some(entries) => Ok(entries),
            None => {
                warn!(path, "directory not found");
                Ok(Vec::new())
            }
        }
    }

    /// Get the latest releases, newest first.
    pub async fn get_releases(&self, per_page: u32) -> Result<Vec<Release>> {
        let endpoint = self.repo_endpoint("/releases");
        let params = [("per_page", per_page.to_string())];
        let releases = self.get_json::<Vec<Release>>(&endpoint, &params).await?;
        Ok(releases.unwrap_or_default())
    }

    /// Get the repository record.
    pub async fn get_repository(&self) -> Result<RepoMetadata> {
        let endpoint = self.repo_endpoint("");
        let metadata = self.get_json::<RepoMetadata>(&endpoint, &[]).await?;

        let rate_limit = self.rate_limit();
        debug!(
            remaining = rate_limit.remaining,
            limit = rate_limit.limit,
            "GitHub rate limit"
        );

        metadata.ok_or_else(|| DocsError::Status {
            status: 404,
            body: format!("repository {} not found", endpoint),
        })
    }
}

#[async_trait]
impl ContentSource for GitHubClient {
    async fn fetch_file(&self, path: &str) -> Result<String> {
        self.get_file(path).await
    }

    async fn fetch_directory(&self, path: &str) -> Result<Vec<ContentEntry>> {
        self.get_directory(path).await
    }

    async fn fetch_releases(&self, limit: u32) -> Result<Vec<Release>> {
        self.get_releases(limit).await
    }

    async fn fetch_repo_metadata(&self) -> Result<RepoMetadata> {
        self.get_repository().await
    }
}
