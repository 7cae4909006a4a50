//! Error types for Ticklist
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Ticklist
#[derive(Debug, Error)]
pub enum TicklistError {
    /// No session, or the session expired
    #[error("Not signed in")]
    Unauthorized,

    /// Request payload could not be decoded
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A field decoded fine but its value is unusable (e.g. blank text)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Checklist does not exist for this owner
    #[error("Checklist not found: {0}")]
    ChecklistNotFound(String),

    /// Task index is outside the checklist's task range. `index` is kept as
    /// given so indexes no `usize` can hold (e.g. `-1`) are reported verbatim.
    #[error("Task {index} not found in checklist {checklist}")]
    TaskNotFound { checklist: String, index: String },

    /// Checklist name already taken for this owner
    #[error("Checklist already exists: {0}")]
    Conflict(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// The login provider rejected or failed an exchange
    #[error("Auth provider error: {0}")]
    Auth(String),

    /// No login provider is configured
    #[error("Login is not configured on this server")]
    LoginUnavailable,

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// HTTP client error while talking to the login provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure categories exposed to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    BadRequest,
    InvalidInput,
    NotFound,
    Conflict,
    LoginUnavailable,
    Upstream,
    Internal,
}

impl ErrorKind {
    /// Stable snake_case code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::LoginUnavailable => "login_unavailable",
            ErrorKind::Upstream => "upstream_auth_failed",
            ErrorKind::Internal => "internal",
        }
    }
}

impl TicklistError {
    /// Classify this error into the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TicklistError::Unauthorized => ErrorKind::Unauthorized,
            TicklistError::BadRequest(_) => ErrorKind::BadRequest,
            TicklistError::InvalidInput(_) => ErrorKind::InvalidInput,
            TicklistError::ChecklistNotFound(_) | TicklistError::TaskNotFound { .. } => ErrorKind::NotFound,
            TicklistError::Conflict(_) => ErrorKind::Conflict,
            TicklistError::LoginUnavailable => ErrorKind::LoginUnavailable,
            TicklistError::Auth(_) | TicklistError::Http(_) => ErrorKind::Upstream,
            TicklistError::Storage(_)
            | TicklistError::Config(_)
            | TicklistError::Io(_)
            | TicklistError::Json(_)
            | TicklistError::Sqlite(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for Ticklist operations
pub type Result<T> = std::result::Result<T, TicklistError>;
