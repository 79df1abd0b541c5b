//! HTTP server for syllabusd

use crate::intake_host::IntakeHost;
use crate::pipeline::Pipeline;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub intake: IntakeHost,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        let pipeline = Arc::new(pipeline);
        Self {
            intake: IntakeHost::new(Arc::clone(&pipeline)),
            pipeline,
            start_time: Instant::now(),
        }
    }
}

/// Build the router with every route group mounted.
///
/// `request_timeout` must exceed the generation timeout, or long generations
/// would be cut off before the backend answers.
pub fn router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .merge(routes::query_routes())
        .merge(routes::intake_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until `shutdown` resolves
pub async fn run(
    state: AppState,
    addr: &str,
    request_timeout: Duration,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router(Arc::new(state), request_timeout);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("  Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
