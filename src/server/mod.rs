//! HTTP server
//!
//! Builds the axum router and runs it until Ctrl+C or SIGTERM.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::{AppState, BackgroundTasks, TaskStats};

use self::middleware::{log_requests, request_id};
use self::routes::{api_info, benchmark, config, not_found};
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the router with all routes and middleware
///
/// Middleware, outermost first: tracing, request id, request logging, timeout.
pub fn build_router(state: Arc<AppState>) -> Router {
    let config_routes = Router::new()
        .route("/config", get(config::get_config))
        .route("/config/", get(config::get_config))
        .route("/actuator/health", get(config::health))
        .route("/actuator/health/", get(config::health));

    let benchmark_routes = Router::new()
        .route("/benchmark/hi", get(benchmark::hi))
        .route("/benchmark/json", get(benchmark::json_response))
        .route(
            "/benchmark/json/post_and_return_modified",
            post(benchmark::post_and_return_modified),
        )
        .route(
            "/benchmark/backgroundtask/immediate_response",
            post(benchmark::immediate_response),
        );

    Router::new()
        .route("/", get(api_info))
        .merge(config_routes)
        .merge(benchmark_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(state.config.server.timeout_secs),
        ))
        .layer(from_fn_with_state(state.clone(), log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until a shutdown signal arrives
pub async fn start_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.server.bind_address();

    tracing::info!(
        api_id = state.config.api_id,
        version = %state.config.api_version,
        "Starting API Template server on {}",
        addr
    );
    tracing::info!(
        "Timeout: {}s, sink: {}",
        state.config.server.timeout_secs,
        state.logger.sink().map(|s| s.name()).unwrap_or("stdout")
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::debug!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
