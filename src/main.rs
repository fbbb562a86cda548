// authx-docs: documentation API for simple-authx.
// Serves cached README, changelog, examples, releases and repository stats from GitHub.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use authx_docs::cache::SystemClock;
use authx_docs::config::Config;
use authx_docs::docs::DocsService;
use authx_docs::github::GitHubClient;
use authx_docs::{Result, server, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    telemetry::init(config.log_format);

    let client = GitHubClient::new(config.repo_target(), config.github_token.as_deref())?;
    let target = client.target();
    info!(
        owner = %target.owner,
        repo = %target.repo,
        api_base = %target.api_base,
        authenticated = config.github_token.is_some(),
        "documenting repository"
    );

    let service = Arc::new(DocsService::new(
        Arc::new(client),
        Arc::new(SystemClock),
        config.package_path.clone(),
        config.ttls(),
    ));

    #[cfg(unix)]
    spawn_cache_reset(service.clone())?;

    let listener = TcpListener::bind(config.bind).await?;
    info!(addr = %config.bind, "listening");

    server::serve(listener, service, shutdown_signal()).await?;

    info!("server shutdown complete");
    Ok(())
}

/// Clear every cache slot on SIGHUP.
#[cfg(unix)]
fn spawn_cache_reset(service: Arc<DocsService>) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("received SIGHUP, clearing cache");
            service.clear_cache().await;
        }
    });
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("received SIGTERM"),
                    _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("received Ctrl+C");
    }
}
