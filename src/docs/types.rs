// Documentation API payloads.
// The bundle, statistics and version records served to the site.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::RepoMetadata;

/// Package author, either `"Name <email>"` style or an npm person object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Person {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl Default for Author {
    fn default() -> Self {
        Author::Name(String::new())
    }
}

/// Fields of `package.json` the site displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub license: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<String, String>>,
}

impl Default for PackageInfo {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            description: "A minimal Express authentication helper".to_string(),
            keywords: vec!["auth".to_string(), "jwt".to_string(), "express".to_string()],
            author: Author::Name("Antony Mwangi".to_string()),
            license: "MIT".to_string(),
            dependencies: None,
        }
    }
}

/// Version reported when nothing better is known.
pub const DEFAULT_VERSION: &str = "2.0.6";

/// An example source file from the package's `examples/` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub name: String,
    pub content: String,
    pub path: String,
}

/// Everything the documentation pages render, fetched in one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsBundle {
    pub readme: String,
    pub changelog: String,
    pub migration: String,
    pub contributing: String,
    pub security: String,
    pub package_info: PackageInfo,
    pub examples: Vec<Example>,
    pub last_updated: DateTime<Utc>,
}

impl DocsBundle {
    /// Bundle served when GitHub has never answered.
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        Self {
            readme: "# Simple AuthX\n\nDocumentation temporarily unavailable.".to_string(),
            changelog: String::new(),
            migration: String::new(),
            contributing: String::new(),
            security: String::new(),
            package_info: PackageInfo::default(),
            examples: Vec::new(),
            last_updated: now,
        }
    }

    /// Markdown text of a named section.
    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::Readme => &self.readme,
            Section::Changelog => &self.changelog,
            Section::Migration => &self.migration,
            Section::Contributing => &self.contributing,
            Section::Security => &self.security,
        }
    }
}

/// The Markdown documents carried by a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Readme,
    Changelog,
    Migration,
    Contributing,
    Security,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Readme,
        Section::Changelog,
        Section::Migration,
        Section::Contributing,
        Section::Security,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Readme => "readme",
            Section::Changelog => "changelog",
            Section::Migration => "migration",
            Section::Contributing => "contributing",
            Section::Security => "security",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Text shown when the document could not be fetched.
    pub fn unavailable_text(&self) -> &'static str {
        match self {
            Section::Readme => {
                "# Documentation temporarily unavailable\n\nPlease visit our \
                 [GitHub repository](https://github.com/Antonymwangi20/simple-authx) \
                 for the latest documentation."
            }
            Section::Changelog => {
                "# Changelog\n\nSee \
                 [GitHub releases](https://github.com/Antonymwangi20/simple-authx/releases) \
                 for version history."
            }
            Section::Migration => "# Migration Guide\n\nMigration guide not yet available.",
            Section::Contributing => {
                "# Contributing\n\nContributions are welcome! Please open an issue or PR on \
                 [GitHub](https://github.com/Antonymwangi20/simple-authx)."
            }
            Section::Security => {
                "# Security Policy\n\nPlease report security issues to antony254mm@gmail.com"
            }
        }
    }
}

/// Repository counters shown on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub language: String,
    pub updated_at: DateTime<Utc>,
}

impl RepoStats {
    /// Statistics served when GitHub has never answered.
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        Self {
            stars: 0,
            forks: 0,
            watchers: 0,
            open_issues: 0,
            language: "TypeScript".to_string(),
            updated_at: now,
        }
    }
}

impl From<RepoMetadata> for RepoStats {
    fn from(meta: RepoMetadata) -> Self {
        Self {
            stars: meta.stargazers_count,
            forks: meta.forks_count,
            watchers: meta.subscribers_count,
            open_issues: meta.open_issues_count,
            language: meta.language.unwrap_or_default(),
            updated_at: meta.updated_at,
        }
    }
}

/// Published versions for the version switcher, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub current: String,
    pub versions: Vec<String>,
}

impl VersionInfo {
    /// Build from release tags, newest first. `v3.1.0` becomes `3.1.0`.
    pub fn from_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Self {
        let versions: Vec<String> = tags
            .into_iter()
            .map(|tag| tag.strip_prefix('v').unwrap_or(tag).to_string())
            .collect();
        let current = versions
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        Self { current, versions }
    }
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            current: DEFAULT_VERSION.to_string(),
            versions: vec![DEFAULT_VERSION.to_string()],
        }
    }
}
