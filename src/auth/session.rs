//! Server-side sessions keyed by an opaque cookie token.
//!
//! The raw token only ever lives in the client's cookie; the table stores its
//! SHA-256 so the database alone cannot be replayed as a login.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{User, UserId};
use crate::error::{Result, TicklistError};
use crate::id::{generate_token, hash_token};
use crate::store::open_connection;

/// SessionStore maps session tokens to signed-in users.
pub struct SessionStore {
    conn: Mutex<Connection>,
    ttl: chrono::Duration,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open or create the session table in the database at `path`.
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration, ttl: chrono::Duration) -> Result<Self> {
        let conn = open_connection(path.as_ref(), busy_timeout)?;
        Self::from_connection(conn, ttl)
    }

    /// Open a private in-memory session store. Useful for tests.
    pub fn open_in_memory(ttl: chrono::Duration) -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, ttl)
    }

    fn from_connection(conn: Connection, ttl: chrono::Duration) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token_hash TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                user_name TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at);
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| TicklistError::Storage(e.to_string()))
    }

    /// How long a new session stays valid.
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Start a session for `user`, returning the token to hand to the client.
    pub fn create(&self, user: &User) -> Result<String> {
        let token = generate_token();
        let now = Utc::now();
        let expires = now + self.ttl;

        self.lock()?.execute(
            r#"
            INSERT INTO sessions (token_hash, user_id, user_name, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                hash_token(&token),
                user.id.as_str(),
                user.name,
                now.timestamp_millis(),
                expires.timestamp_millis()
            ],
        )?;

        log::info!("Session started for user {}", user.id);
        Ok(token)
    }

    /// Resolve a token to its user. Unknown and expired tokens yield `None`.
    pub fn lookup(&self, token: &str) -> Result<Option<User>> {
        let row: Option<(String, String)> = self
            .lock()?
            .query_row(
                "SELECT user_id, user_name FROM sessions WHERE token_hash = ?1 AND expires_at > ?2",
                params![hash_token(token), Utc::now().timestamp_millis()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(row.map(|(id, name)| User::new(UserId::new(id), name)))
    }

    /// End a session. Returns whether a session was removed.
    pub fn revoke(&self, token: &str) -> Result<bool> {
        let removed = self
            .lock()?
            .execute("DELETE FROM sessions WHERE token_hash = ?1", [hash_token(token)])?;
        Ok(removed > 0)
    }

    /// Delete every expired session, returning how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let removed = self
            .lock()?
            .execute("DELETE FROM sessions WHERE expires_at <= ?1", [Utc::now().timestamp_millis()])?;
        Ok(removed)
    }
}
