// HTTP server for the documentation API.
// Routes /api/docs, /api/stats and /api/versions onto the docs service.

pub mod error;
pub mod handlers;
pub mod logging;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use tokio::net::TcpListener;

use crate::docs::DocsService;
use crate::error::Result;

pub use error::ApiError;

pub fn router(service: Arc<DocsService>) -> Router {
    Router::new()
        .route("/api/docs", get(handlers::docs))
        .route("/api/docs/:section/segments", get(handlers::segments))
        .route("/api/stats", get(handlers::stats))
        .route("/api/versions", get(handlers::versions))
        .layer(middleware::from_fn(logging::log_requests))
        .with_state(service)
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve(
    listener: TcpListener,
    service: Arc<DocsService>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::github::EntryKind;
    use crate::testutil::{FakeSource, entry, metadata};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const README: &str = "# Simple AuthX\n\nInstall:\n\n```bash\nnpm i simple-authx\n```";
    const PACKAGE_JSON: &str = r#"{"version": "3.1.0", "license": "MIT"}"#;

    fn source() -> FakeSource {
        FakeSource::new()
            .with_file("simple-authx/README.md", README)
            .with_file("simple-authx/package.json", PACKAGE_JSON)
            .with_directory(
                "simple-authx/examples",
                vec![entry("simple-authx/examples/basic.js", EntryKind::File)],
            )
            .with_file("simple-authx/examples/basic.js", "createAuth();")
            .with_releases(&["v3.1.0", "v3.0.0"])
            .with_metadata(metadata(42))
    }

    fn build_app(source: Arc<FakeSource>) -> Router {
        let clock = Arc::new(ManualClock::epoch());
        router(Arc::new(DocsService::with_defaults(source, clock)))
    }

    async fn get_path(app: Router, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_stats_route() {
        let app = build_app(Arc::new(source()));
        let response = get_path(app, "/api/stats").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );
        assert_eq!(
            body_json(response).await,
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
    async fn test_docs_route() {
        let app = build_app(Arc::new(source()));
        let response = get_path(app, "/api/docs").await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=300");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");

        let body = body_json(response).await;
        let readme = body["readme"].as_str().unwrap();
        assert!(readme.starts_with("# Simple AuthX"));
        assert_eq!(body["packageInfo"]["version"], "3.1.0");
        assert_eq!(
            body["examples"],
            json!([{
                "name": "basic.js",
                "content": "createAuth();",
                "path": "simple-authx/examples/basic.js"
            }])
        );
        assert_eq!(body["lastUpdated"], "2025-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_docs_route_serves_placeholder_when_upstream_down() {
        let source = Arc::new(source());
        source.set_down(true);

        let response = get_path(build_app(source), "/api/docs").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["readme"],
            "# Simple AuthX\n\nDocumentation temporarily unavailable."
        );
        assert_eq!(body["packageInfo"]["version"], "2.0.6");
    }

    #[tokio::test]
    async fn test_versions_route() {
        let app = build_app(Arc::new(source()));
        let response = get_path(app, "/api/versions").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );
        assert_eq!(
            body_json(response).await,
            json!({"current": "3.1.0", "versions": ["3.1.0", "3.0.0"]})
        );
    }

    #[tokio::test]
    async fn test_segments_route() {
        let app = build_app(Arc::new(source()));
        let response = get_path(app, "/api/docs/readme/segments").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([
                {"type": "prose", "html": "<h1>Simple AuthX</h1><p>Install:</p><p></p>"},
                {"type": "code", "lang": "bash", "code": "npm i simple-authx"}
            ])
        );
    }

    #[tokio::test]
    async fn test_segments_unknown_section() {
        let app = build_app(Arc::new(source()));
        let response = get_path(app, "/api/docs/license/segments").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Unknown section: license"})
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = build_app(Arc::new(source()));
        let response = get_path(app, "/api/nothing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
