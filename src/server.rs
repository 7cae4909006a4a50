//! Wiring of config, stores and router into a running HTTP server

use std::sync::Arc;

use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;

use crate::api::{AppState, build_router};
use crate::auth::SessionStore;
use crate::config::Config;
use crate::error::Result;
use crate::store::{Journal, SqliteStore};

/// Open the checklist store, attaching the audit journal when configured
pub fn open_store(config: &Config) -> Result<SqliteStore> {
    let store = SqliteStore::open(&config.storage.db_path, config.storage.busy_timeout())?;
    match &config.storage.journal_path {
        Some(path) => {
            let journal = Journal::open(path)?;
            info!("Journaling checklist changes to {}", journal.path().display());
            Ok(store.with_journal(journal))
        }
        None => Ok(store),
    }
}

/// Sessions live in the same database file as checklists
pub fn open_sessions(config: &Config) -> Result<SessionStore> {
    SessionStore::open(
        &config.storage.db_path,
        config.storage.busy_timeout(),
        config.auth.session_ttl(),
    )
}

pub fn build_app(config: &Config) -> Result<Router> {
    let store = open_store(config)?;
    let sessions = open_sessions(config)?;

    let purged = sessions.purge_expired()?;
    if purged > 0 {
        info!("Purged {} expired sessions", purged);
    }

    let state = AppState::new(Arc::new(store), Arc::new(sessions), config)?;
    Ok(build_router(state))
}

/// Bind the configured listen address
pub async fn bind(config: &Config) -> Result<TcpListener> {
    let addr = config.server.bind_addr()?;
    Ok(TcpListener::bind(addr).await?)
}

/// Serve on an already bound listener until ctrl-c
pub async fn serve_on(listener: TcpListener, config: &Config) -> Result<()> {
    let app = build_app(config)?;
    info!(
        "Listening on http://{} (database: {})",
        listener.local_addr()?,
        config.storage.db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => warn!("Failed to listen for ctrl-c: {}", e),
    }
}
