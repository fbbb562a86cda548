// Content source abstraction.
// The assembler and the docs service talk to GitHub only through this trait.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::error::Result;

use super::types::{ContentEntry, Release, RepoMetadata};

/// Read-only access to one repository's files, releases and metadata.
///
/// Missing files and directories are not errors: implementations return an
/// empty string or an empty list. Errors mean the content could not be
/// obtained after retrying.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Decoded text of the file at `path`, or `""` if it does not exist.
    async fn fetch_file(&self, path: &str) -> Result<String>;

    /// Entries of the directory at `path`, in the order the API lists them.
    async fn fetch_directory(&self, path: &str) -> Result<Vec<ContentEntry>>;

    /// Up to `limit` releases, newest first.
    async fn fetch_releases(&self, limit: u32) -> Result<Vec<Release>>;

    /// Repository counters and language.
    async fn fetch_repo_metadata(&self) -> Result<RepoMetadata>;
}
