//! reel-server: HTTP streaming server.
//!
//! Ties the byte-range primitives from `reel-stream` to the SQLite library in
//! `reel-db`. It provides:
//!
//! - Axum routes serving files by catalog id or encoded path, always `206`
//! - Auto-watch: a detached write once a configured fraction has been served
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod library;
pub mod middleware;
pub mod resolver;
pub mod router;
pub mod routes;
pub mod watch;

use std::net::SocketAddr;

use reel_core::config::Config;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::library::SqliteLibrary;

/// Start the reelstream server.
///
/// Initializes the database, constructs the [`AppContext`] and serves until a
/// shutdown signal is received.
pub async fn start(config: Config) -> reel_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let db_path = &config.server.db_path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db_str = db_path.to_string_lossy();
    let db = reel_db::pool::init_pool(&db_str)?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| reel_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::new(config, SqliteLibrary::new(db));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| reel_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Starting server on {addr}");

    serve(listener, ctx, CancellationToken::new()).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Serve the router on an already bound listener until `cancel` fires or a
/// shutdown signal arrives.
pub async fn serve(
    listener: tokio::net::TcpListener,
    ctx: AppContext,
    cancel: CancellationToken,
) -> reel_core::Result<()> {
    let app = router::build_router(ctx);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or for `cancel`.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
        _ = cancel.cancelled() => tracing::info!("Shutdown requested"),
    }
}
