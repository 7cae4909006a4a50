//! JSON API over the checklist store
//!
//! Every `/api` route resolves the owner from the session cookie through
//! [`CurrentUser`]; there is no way to name another user's data in a request.
//! Store and session calls are blocking SQLite work and run on the blocking pool.

pub mod checklists;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod session_routes;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use serde_json::{Value, json};

use crate::auth::{OAuthClient, SessionStore};
use crate::config::{AuthConfig, Config};
use crate::error::{Result, TicklistError};
use crate::store::ChecklistStore;

pub use extract::CurrentUser;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ChecklistStore>,
    pub sessions: Arc<SessionStore>,
    pub oauth: Option<Arc<OAuthClient>>,
    pub auth: Arc<AuthConfig>,
    pub max_body_bytes: usize,
    pub(crate) request_ids: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(store: Arc<dyn ChecklistStore>, sessions: Arc<SessionStore>, config: &Config) -> Result<Self> {
        let oauth = config
            .auth
            .oauth
            .clone()
            .map(OAuthClient::new)
            .transpose()?
            .map(Arc::new);

        if oauth.is_none() {
            log::warn!("No auth.oauth section configured; /auth/login is unavailable");
        }

        Ok(Self {
            store,
            sessions,
            oauth,
            auth: Arc::new(config.auth.clone()),
            max_body_bytes: config.server.max_body_bytes,
            request_ids: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Run a closure against the checklist store on the blocking pool
    pub(crate) async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn ChecklistStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| TicklistError::Storage(format!("store task failed: {}", e)))?
    }

    /// Run a closure against the session store on the blocking pool
    pub(crate) async fn with_sessions<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SessionStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sessions = Arc::clone(&self.sessions);
        tokio::task::spawn_blocking(move || f(sessions.as_ref()))
            .await
            .map_err(|e| TicklistError::Storage(format!("session task failed: {}", e)))?
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/checklists", get(checklists::list).post(checklists::create))
        .route("/api/checklists/:name", put(checklists::rename).delete(checklists::delete))
        .route("/api/checklists/:name/tasks", post(checklists::add_task))
        .route(
            "/api/checklists/:name/tasks/:index",
            put(checklists::toggle_task).delete(checklists::delete_task),
        )
        .route("/api/checklists/:name/tasks/:index/edit", put(checklists::edit_task))
        .route("/api/me", get(session_routes::me))
        .route("/auth/login", get(session_routes::login))
        .route("/auth/callback", get(session_routes::callback))
        .route("/auth/logout", get(session_routes::logout).post(session_routes::logout))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing,
        ))
        .with_state(state)
}

async fn healthz() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
