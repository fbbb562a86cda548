// Documentation assembler.
// Fetches every document, the examples and package metadata concurrently into one bundle.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::Clock;
use crate::error::Result;
use crate::github::{ContentEntry, ContentSource};

use super::types::{DocsBundle, Example, PackageInfo, Section};

/// Package directory inside the repository.
pub const DEFAULT_PACKAGE_PATH: &str = "simple-authx";

/// Examples beyond this many are ignored.
pub const MAX_EXAMPLES: usize = 5;

const EXAMPLE_EXTENSIONS: [&str; 2] = [".js", ".ts"];

/// Outcome of one task in a settle-all join.
struct Settled<T> {
    value: T,
    failed: bool,
}

/// Await `task`, substituting `fallback` if it fails.
async fn settle<T>(
    name: &str,
    task: impl Future<Output = Result<T>>,
    fallback: impl FnOnce() -> T,
) -> Settled<T> {
    match task.await {
        Ok(value) => Settled {
            value,
            failed: false,
        },
        Err(err) => {
            warn!(task = name, error = %err, "fetch failed, using fallback");
            Settled {
                value: fallback(),
                failed: true,
            }
        }
    }
}

/// A freshly assembled bundle and how many of its fetches failed.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub bundle: DocsBundle,
    pub failed: usize,
    pub total: usize,
}

impl Assembly {
    /// Whether nothing at all could be fetched.
    pub fn all_failed(&self) -> bool {
        self.failed == self.total
    }
}

/// Builds [`DocsBundle`]s from a content source.
pub struct DocsAssembler {
    source: Arc<dyn ContentSource>,
    clock: Arc<dyn Clock>,
    package_path: String,
}

impl DocsAssembler {
    pub fn new(
        source: Arc<dyn ContentSource>,
        clock: Arc<dyn Clock>,
        package_path: impl Into<String>,
    ) -> Self {
        Self {
            source,
            clock,
            package_path: package_path.into(),
        }
    }

    /// Repository path of a document. The security policy lives at the root.
    pub fn document_path(&self, section: Section) -> String {
        match section {
            Section::Readme => format!("{}/README.md", self.package_path),
            Section::Changelog => format!("{}/CHANGELOG.md", self.package_path),
            Section::Migration => format!("{}/MIGRATION.md", self.package_path),
            Section::Contributing => format!("{}/CONTRIBUTING.md", self.package_path),
            Section::Security => "SECURITY.md".to_string(),
        }
    }

    /// Fetch everything and build a bundle. Never fails as a whole.
    pub async fn assemble(&self) -> Assembly {
        debug!(package = %self.package_path, "assembling documentation");

        let (pkg, readme, changelog, migration, contributing, security, examples) = tokio::join!(
            self.package_info(),
            self.document(Section::Readme),
            self.document(Section::Changelog),
            self.document(Section::Migration),
            self.document(Section::Contributing),
            self.document(Section::Security),
            self.examples(),
        );

        let failed = [
            pkg.failed,
            readme.failed,
            changelog.failed,
            migration.failed,
            contributing.failed,
            security.failed,
            examples.failed,
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count();

        let bundle = DocsBundle {
            readme: readme.value,
            changelog: changelog.value,
            migration: migration.value,
            contributing: contributing.value,
            security: security.value,
            package_info: pkg.value,
            examples: examples.value,
            last_updated: self.clock.now(),
        };

        info!(
            failed,
            examples = bundle.examples.len(),
            "documentation assembled"
        );

        Assembly {
            bundle,
            failed,
            total: 7,
        }
    }

    async fn document(&self, section: Section) -> Settled<String> {
        let path = self.document_path(section);
        settle(section.name(), self.source.fetch_file(&path), || {
            section.unavailable_text().to_string()
        })
        .await
    }

    async fn package_info(&self) -> Settled<PackageInfo> {
        let path = format!("{}/package.json", self.package_path);
        let fetch = self.source.fetch_file(&path);
        let settled = settle("package.json", fetch, String::new).await;

        let value = if settled.value.is_empty() {
            PackageInfo::default()
        } else {
            serde_json::from_str(&settled.value).unwrap_or_else(|err| {
                warn!(error = %err, "unparsable package.json, using defaults");
                PackageInfo::default()
            })
        };

        Settled {
            value,
            failed: settled.failed,
        }
    }

    async fn examples(&self) -> Settled<Vec<Example>> {
        let dir = format!("{}/examples", self.package_path);
        let fetch = self.source.fetch_directory(&dir);
        let listing = settle("examples", fetch, Vec::new).await;

        let selected = listing
            .value
            .into_iter()
            .filter(|entry| is_example(entry))
            .take(MAX_EXAMPLES);

        let fetched = join_all(selected.map(|entry| async move {
            match self.source.fetch_file(&entry.path).await {
                Ok(content) => Some(Example {
                    name: entry.name,
                    content,
                    path: entry.path,
                }),
                Err(err) => {
                    warn!(example = %entry.name, error = %err, "dropping example");
                    None
                }
            }
        }))
        .await;

        Settled {
            value: fetched.into_iter().flatten().collect(),
            failed: listing.failed,
        }
    }
}

fn is_example(entry: &ContentEntry) -> bool {
    let name = entry.name.as_str();
    entry.is_file() && EXAMPLE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
