//! Domain types for Ticklist
//!
//! - Checklist / Task: the owner-scoped lists and their ordered entries
//! - User / UserId: the identity handed over by the login provider

pub mod checklist;
pub mod user;

pub use checklist::{Checklist, Task, normalize_checklist_name, normalize_task_text};
pub use user::{User, UserId};
