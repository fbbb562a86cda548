// Command-line and environment configuration.
// Every option can be given as a flag or through its environment variable.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::docs::{CacheTtls, DEFAULT_PACKAGE_PATH};
use crate::github::RepoTarget;
use crate::github::client::GITHUB_API_BASE;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line, human readable
    Pretty,
    /// One line per event
    Compact,
    /// Structured JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "authx-docs")]
#[command(about = "Documentation API for simple-authx, served from GitHub with caching")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "AUTHX_DOCS_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// GitHub token, raises the API rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    #[arg(long, env = "GITHUB_API_BASE", default_value = GITHUB_API_BASE)]
    pub api_base: String,

    #[arg(long, env = "AUTHX_DOCS_OWNER", default_value = "Antonymwangi20")]
    pub owner: String,

    #[arg(long, env = "AUTHX_DOCS_REPO", default_value = "simple-authx")]
    pub repo: String,

    /// Directory of the package inside the repository
    #[arg(long, env = "AUTHX_DOCS_PACKAGE_PATH", default_value = DEFAULT_PACKAGE_PATH)]
    pub package_path: String,

    #[arg(long, env = "AUTHX_DOCS_DOCS_TTL", default_value_t = 300)]
    pub docs_ttl_secs: u64,

    #[arg(long, env = "AUTHX_DOCS_STATS_TTL", default_value_t = 300)]
    pub stats_ttl_secs: u64,

    #[arg(long, env = "AUTHX_DOCS_VERSIONS_TTL", default_value_t = 3600)]
    pub versions_ttl_secs: u64,

    #[arg(long, env = "AUTHX_DOCS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn repo_target(&self) -> RepoTarget {
        RepoTarget::new(&self.owner, &self.repo).with_api_base(&self.api_base)
    }

    pub fn ttls(&self) -> CacheTtls {
        CacheTtls {
            docs: Duration::from_secs(self.docs_ttl_secs),
            stats: Duration::from_secs(self.stats_ttl_secs),
            versions: Duration::from_secs(self.versions_ttl_secs),
        }
    }
}
