// GitHub API module.
// Client, retry policy, content decoding and types for the repository being documented.

pub mod client;
pub mod decode;
pub mod endpoints;
pub mod retry;
pub mod source;
pub mod types;

pub use client::{GitHubClient, RepoTarget};
pub use retry::RetryPolicy;
pub use source::ContentSource;
#[cfg(test)]
pub use source::MockContentSource;
pub use types::*;
