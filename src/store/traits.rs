//! The checklist store contract.

use crate::domain::{Checklist, UserId};
use crate::error::Result;

/// Owner-scoped persistence for checklists and their tasks.
///
/// Every method takes the owner explicitly; implementations must never read
/// or write a record belonging to anyone else. Each mutation is an atomic
/// read-modify-write of a single checklist record, persisted before it
/// returns, and the returned `Checklist` is the post-mutation state.
pub trait ChecklistStore: Send + Sync {
    /// All checklists belonging to `owner`.
    fn list_checklists(&self, owner: &UserId) -> Result<Vec<Checklist>>;

    /// A single checklist, if it exists.
    fn get_checklist(&self, owner: &UserId, name: &str) -> Result<Option<Checklist>>;

    /// Create an empty checklist. Fails with `Conflict` if the name is taken.
    fn create_checklist(&self, owner: &UserId, name: &str) -> Result<Checklist>;

    /// Rename a checklist, keeping its tasks.
    fn rename_checklist(&self, owner: &UserId, old_name: &str, new_name: &str) -> Result<Checklist>;

    /// Remove a checklist and all of its tasks.
    fn delete_checklist(&self, owner: &UserId, name: &str) -> Result<()>;

    /// Append an open task.
    fn add_task(&self, owner: &UserId, name: &str, text: &str) -> Result<Checklist>;

    /// Flip the `done` flag of the task at `index`.
    fn toggle_task(&self, owner: &UserId, name: &str, index: usize) -> Result<Checklist>;

    /// Replace the text of the task at `index`.
    fn edit_task(&self, owner: &UserId, name: &str, index: usize, text: &str) -> Result<Checklist>;

    /// Remove the task at `index`, shifting later tasks down.
    fn delete_task(&self, owner: &UserId, name: &str, index: usize) -> Result<Checklist>;
}
