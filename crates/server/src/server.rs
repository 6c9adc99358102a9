//! Server initialization and routing

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{api_info, catalog, health, matching, not_found};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware.
///
/// Request IDs are assigned before request logging runs, so every log line
/// for a request carries its ID.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let api_routes = Router::new()
        .route("/api/v1/schema", get(catalog::schema))
        .route("/api/v1/match", post(matching::match_record))
        .route("/api/v1/match/bulk", post(matching::match_bulk_json))
        .route("/api/v1/match/bulk/csv", post(matching::match_bulk_csv))
        .route("/api/v1/catalog/stats", get(catalog::catalog_stats))
        .route("/api/v1/catalog/reload", post(catalog::reload_catalog))
        .layer(DefaultBodyLimit::max(state.config.max_body_size()));

    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .merge(api_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Planet Finder HTTP server.
///
/// Loads the catalog named in `config`, binds, and serves until SIGTERM or
/// Ctrl+C. Fails before binding if the catalog cannot be loaded.
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(ServerState::new(config.clone())?);
    let records = state.matcher().catalog().len();

    let app = build_router(state);
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        %addr,
        catalog = %config.catalog_path.display(),
        records,
        "Starting Planet Finder server"
    );
    tracing::info!(
        timeout_secs = config.timeout_secs,
        max_body_mb = config.max_body_size_mb,
        cors = config.enable_cors,
        "Server limits"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
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
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
