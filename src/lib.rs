//! Ticklist - a personal checklist server
//!
//! Signed-in users manage named checklists of tasks through a JSON API.
//! Every checklist belongs to exactly one owner and every read or write is
//! scoped to the owner of the current session.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod id;
pub mod server;
pub mod store;

pub use error::{Result, TicklistError};
