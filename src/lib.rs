// authx-docs library.
// GitHub-backed documentation cache and the HTTP API that serves it.

pub mod cache;
pub mod config;
pub mod docs;
pub mod error;
pub mod github;
pub mod markdown;
pub mod server;
pub mod telemetry;
#[cfg(test)]
mod testutil;

pub use error::{DocsError, Result};
