//! Authentication collaborator
//!
//! Turns a browser session into a `User`. The login itself is delegated to an
//! external OAuth provider; this module only keeps sessions and talks the
//! authorization-code flow.

pub mod cookies;
pub mod oauth;
pub mod session;

pub use oauth::OAuthClient;
pub use session::SessionStore;

/// Cookie carrying the OAuth `state` between `/auth/login` and the callback
pub const OAUTH_STATE_COOKIE: &str = "ticklist_oauth_state";

/// Lifetime of the OAuth `state` cookie
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 600;
