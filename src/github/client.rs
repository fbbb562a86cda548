// GitHub API HTTP client.
// Handles authentication, rate limit tracking, retries, and response classification.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DocsError, Result};

use super::decode::{DecodeFn, decode_base64};
use super::retry::RetryPolicy;
use super::types::RateLimit;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = "authx-docs";

/// Repository the client is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
}

impl RepoTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

/// Last seen rate limit headers. Updated from concurrent requests.
#[derive(Debug, Default)]
struct RateLimitState {
    limit: AtomicU64,
    remaining: AtomicU64,
    reset: AtomicU64,
}

impl RateLimitState {
    fn snapshot(&self) -> RateLimit {
        RateLimit {
            limit: self.limit.load(Ordering::Relaxed),
            remaining: self.remaining.load(Ordering::Relaxed),
            reset: self.reset.load(Ordering::Relaxed),
        }
    }
}

/// GitHub API client scoped to a single repository.
pub struct GitHubClient {
    client: Client,
    target: RepoTarget,
    retry: RetryPolicy,
    pub(super) decode: DecodeFn,
    rate_limit: RateLimitState,
}

impl GitHubClient {
    /// Create a client. Requests are unauthenticated when `token` is `None`.
    pub fn new(target: RepoTarget, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            target,
            retry: RetryPolicy::default(),
            decode: decode_base64,
            rate_limit: RateLimitState::default(),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the function used to decode file bodies.
    pub fn with_decoder(mut self, decode: DecodeFn) -> Self {
        self.decode = decode;
        self
    }

    pub fn target(&self) -> &RepoTarget {
        &self.target
    }

    /// Get the current rate limit information.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit.snapshot()
    }

    /// Endpoint path under `/repos/{owner}/{repo}`.
    pub(super) fn repo_endpoint(&self, suffix: &str) -> String {
        format!(
            "/repos/{}/{}{}",
            self.target.owner, self.target.repo, suffix
        )
    }

    /// GET `endpoint` and decode the JSON body, retrying failures.
    ///
    /// Returns `None` for 404 without retrying.
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let operation = format!("GET {}", endpoint);
        self.retry
            .run(&operation, move || self.get_json_once(endpoint, query))
            .await
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        match self.get(endpoint, query).await? {
            Some(response) => {
                let body = response.bytes().await?;
                Ok(Some(serde_json::from_slice(&body)?))
            }
            None => Ok(None),
        }
    }

    /// Make a single GET request to the GitHub API.
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Option<Response>> {
        let url = format!("{}{}", self.target.api_base, endpoint);
        let response = self.client.get(&url).query(query).send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
        };

        if let Some(limit) = header("x-ratelimit-limit") {
            self.rate_limit.limit.store(limit, Ordering::Relaxed);
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            self.rate_limit
                .remaining
                .store(remaining, Ordering::Relaxed);
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            self.rate_limit.reset.store(reset, Ordering::Relaxed);
        }
    }

    /// Check response status and convert errors. 404 maps to `None`.
    async fn check_response(&self, response: Response) -> Result<Option<Response>> {
        match response.status() {
            status if status.is_success() => Ok(Some(response)),
            StatusCode::NOT_FOUND => {
                debug!(url = %response.url(), "not found on GitHub");
                Ok(None)
            }
            StatusCode::UNAUTHORIZED => Err(DocsError::Unauthorized),
            StatusCode::FORBIDDEN => {
                let rate_limit = self.rate_limit.snapshot();
                if response.headers().contains_key("x-ratelimit-remaining")
                    && rate_limit.remaining == 0
                {
                    let reset_at = chrono::DateTime::from_timestamp(rate_limit.reset as i64, 0)
                        .map(|dt| dt.format("%H:%M:%S").to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    Err(DocsError::RateLimited { reset_at })
                } else {
                    Err(DocsError::Status {
                        status: StatusCode::FORBIDDEN.as_u16(),
                        body: response.text().await.unwrap_or_default(),
                    })
                }
            }
            status => Err(DocsError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
