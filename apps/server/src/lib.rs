//! # OrderDesk Server
//!
//! HTTP boundary between the conversational interpreter and the ordering
//! core. Each tool call names a session, and each session has its own cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  interpreter ── POST /sessions/{id}/tools/{tool} ──┐                    │
//! │                                                    ▼                    │
//! │  routes ──► Operation::parse ──► tools::dispatch ──► Cart (per session)│
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                 OrderSink (SQLite)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing
//! 2. Load configuration (defaults, file, environment)
//! 3. Open the database, run migrations, seed an empty catalog
//! 4. Start the idle-session sweeper
//! 5. Serve until Ctrl+C

pub mod config;
pub mod error;
pub mod routes;
pub mod sink;
pub mod state;
pub mod tools;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,orderdesk=debug,sqlx=warn")),
        )
        .init();
}

/// Runs the server until Ctrl+C.
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    let state = Arc::new(AppState::initialize(&config.database).await?);
    info!(items = state.menu().await.len(), "Menu ready");

    let sweeper = state.sessions().clone().spawn_sweeper(
        config.sessions.idle_timeout(),
        config.sessions.sweep_interval(),
    );

    let app = routes::router(state.clone());

    let bind_addr = config.server.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| ServerError::BindFailed {
            addr: bind_addr.clone(),
            reason: e.to_string(),
        })?;

    info!(addr = %bind_addr, "OrderDesk server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(e.to_string()));

    sweeper.abort();
    state.db().close().await;

    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C; shutting down"),
    }
}
