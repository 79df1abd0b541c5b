//! Syllabus Daemon - course scenario generation service
//!
//! Serves the query and intake HTTP routes, generating scenarios with a local
//! Ollama model and saving them to the course store and GitHub.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use syllabusd::config::{self, Config};
use syllabusd::github::GitHubFileSink;
use syllabusd::ollama::OllamaGateway;
use syllabusd::pipeline::{Pipeline, TextGenerator};
use syllabusd::server::{self, AppState};
use syllabusd::store::SqliteCourseStore;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Slack on top of the generation timeout for rendering and persistence
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before the subscriber so RUST_LOG may come from the file.
    let env_file = config::load_env_file();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Syllabus Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    match env_file {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Invalid environment file");
        }
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Invalid configuration");
        }
    };

    let store = SqliteCourseStore::open(config.store.location())
        .await
        .context("Failed to open course store")?;

    let gateway = Arc::new(
        OllamaGateway::new(config.ollama.clone(), config.generation.clone())
            .context("Failed to create Ollama client")?,
    );

    // Warm the backend now so the first request does not pay for a pull.
    match gateway.ensure_ready().await {
        Ok(()) => info!("Model {} ready", gateway.model()),
        Err(e) => warn!("Backend not ready yet, will retry on first request: {}", e),
    }

    let pipeline = Pipeline::new(
        Arc::clone(&gateway) as Arc<dyn TextGenerator>,
        Arc::new(store),
        Arc::new(GitHubFileSink::new(config.github.clone())),
    );

    let request_timeout =
        Duration::from_secs(config.generation.timeout_secs) * 2 + REQUEST_TIMEOUT_SLACK;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutting down gracefully");
    };

    let result = server::run(AppState::new(pipeline), &config.listen, request_timeout, shutdown).await;

    gateway.shutdown().await;
    result
}
