//! Storage layer for Ticklist.
//!
//! Checklists are persisted in SQLite, one row per `(owner, name)` record.
//! An optional JSONL journal keeps an append-only history of mutations.
//!
//! # Example
//!
//! ```ignore
//! use ticklist::domain::UserId;
//! use ticklist::store::{ChecklistStore, SqliteStore, DEFAULT_BUSY_TIMEOUT};
//!
//! let store = SqliteStore::open("/tmp/ticklist.db", DEFAULT_BUSY_TIMEOUT)?;
//! let owner = UserId::new("alice");
//! store.create_checklist(&owner, "Trip")?;
//! let trip = store.add_task(&owner, "Trip", "Pack bags")?;
//! ```

mod journal;
mod sqlite;
mod traits;

pub use journal::{Journal, JournalEntry};
pub use sqlite::{DEFAULT_BUSY_TIMEOUT, SqliteStore, open_connection};
pub use traits::ChecklistStore;
