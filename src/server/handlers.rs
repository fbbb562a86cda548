// Route handlers.
// Serialize service output as JSON with the cache headers the site expects.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::docs::{DocsService, Section};
use crate::markdown::{self, Segment};

use super::error::ApiError;

/// Browser and CDN lifetime for documentation responses, in seconds.
pub const DOCS_MAX_AGE: u32 = 300;
/// Lifetime for stats and versions.
pub const META_MAX_AGE: u32 = 3600;

pub async fn docs(State(service): State<Arc<DocsService>>) -> Result<Response, ApiError> {
    let bundle = service.documentation().await;
    cached_json(&bundle, DOCS_MAX_AGE).map_err(|err| ApiError::Docs {
        message: err.to_string(),
    })
}

pub async fn stats(State(service): State<Arc<DocsService>>) -> Result<Response, ApiError> {
    let stats = service.repo_stats().await;
    cached_json(&stats, META_MAX_AGE).map_err(|err| ApiError::Stats {
        message: err.to_string(),
    })
}

pub async fn versions(State(service): State<Arc<DocsService>>) -> Result<Response, ApiError> {
    let versions = service.versions().await;
    cached_json(&versions, META_MAX_AGE).map_err(|err| ApiError::Versions {
        message: err.to_string(),
    })
}

/// One section split into rendered prose and raw code blocks.
pub async fn segments(
    State(service): State<Arc<DocsService>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let section = Section::from_name(&name).ok_or(ApiError::UnknownSection(name))?;
    let bundle = service.documentation().await;

    let views: Vec<SegmentView> = markdown::split_segments(bundle.section(section))
        .into_iter()
        .map(SegmentView::from)
        .collect();

    cached_json(&views, DOCS_MAX_AGE).map_err(|err| ApiError::Docs {
        message: err.to_string(),
    })
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SegmentView {
    Prose { html: String },
    Code { lang: String, code: String },
}

impl From<Segment> for SegmentView {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Prose { text } => SegmentView::Prose {
                html: markdown::render_prose(&text),
            },
            Segment::Code { lang, code } => SegmentView::Code { lang, code },
        }
    }
}

fn cached_json<T: Serialize>(value: &T, max_age: u32) -> serde_json::Result<Response> {
    let body = serde_json::to_vec(value)?;
    let cache_control = format!("public, max-age={}", max_age);

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, cache_control.as_str()),
        ],
        body,
    )
        .into_response())
}
