//! SQLite-backed checklist store.
//!
//! One row per checklist, keyed by `(owner, name)`. Tasks live in a JSON column
//! so a checklist is a single record and a single unit of consistency.
//!
//! Mutations run in a `BEGIN IMMEDIATE` transaction and finish with an update
//! conditioned on the row's `version`. SQLite's own write lock makes this safe
//! across processes sharing the database file, not just across threads.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{Connection, ErrorCode, OptionalExtension, TransactionBehavior, params};
use serde_json::{Value, json};

use crate::domain::{Checklist, Task, UserId, normalize_checklist_name, normalize_task_text};
use crate::error::{Result, TicklistError};
use crate::id::now_ms;
use crate::store::journal::{Journal, JournalEntry};
use crate::store::traits::ChecklistStore;

/// Default time a writer waits on another connection's lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite connection with the pragmas every ticklist connection uses.
pub fn open_connection(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    configure(&conn, busy_timeout)?;
    Ok(conn)
}

fn configure(conn: &Connection, busy_timeout: Duration) -> Result<()> {
    conn.busy_timeout(busy_timeout)?;
    let _mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

/// True if a SQLite error is a UNIQUE / PRIMARY KEY violation.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

/// SqliteStore persists checklists in a SQLite database.
///
/// rusqlite's `Connection` is not `Sync`, so it sits behind a `Mutex`; the
/// mutex only serializes this process's use of its one connection; atomicity
/// against other processes comes from SQLite transactions.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    journal: Option<Journal>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("journal", &self.journal)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create a store at the given database path.
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let conn = open_connection(path.as_ref(), busy_timeout)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory store. Useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            journal: None,
        })
    }

    /// Record every committed mutation in `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS checklists (
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                tasks TEXT NOT NULL,
                version INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (owner, name)
            );

            CREATE INDEX IF NOT EXISTS idx_checklists_owner_created ON checklists(owner, created_at);
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| TicklistError::Storage(e.to_string()))
    }

    fn record(&self, owner: &UserId, checklist: &str, action: &str, detail: Value) {
        if let Some(journal) = &self.journal {
            let entry = JournalEntry::new(owner, checklist, action, detail);
            if let Err(e) = journal.append(&entry) {
                log::warn!("Failed to append to journal {}: {}", journal.path().display(), e);
            }
        }
    }

    /// Atomic read-modify-write of one checklist record.
    ///
    /// `apply` mutates the loaded checklist and returns a journal detail; an
    /// error from `apply` rolls the transaction back untouched.
    fn mutate<F>(&self, owner: &UserId, name: &str, action: &str, apply: F) -> Result<Checklist>
    where
        F: FnOnce(&mut Checklist) -> Result<Value>,
    {
        let (checklist, detail) = {
            let mut conn = self.lock()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let row: Option<(String, i64)> = tx
                .query_row(
                    "SELECT tasks, version FROM checklists WHERE owner = ?1 AND name = ?2",
                    params![owner.as_str(), name],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            let (tasks_json, version) = row.ok_or_else(|| TicklistError::ChecklistNotFound(name.to_string()))?;

            let mut checklist = Checklist {
                name: name.to_string(),
                owner: owner.clone(),
                tasks: serde_json::from_str(&tasks_json)?,
            };
            let detail = apply(&mut checklist)?;

            let updated = tx.execute(
                r#"
                UPDATE checklists SET tasks = ?1, version = version + 1, updated_at = ?2
                WHERE owner = ?3 AND name = ?4 AND version = ?5
                "#,
                params![
                    serde_json::to_string(&checklist.tasks)?,
                    now_ms(),
                    owner.as_str(),
                    name,
                    version
                ],
            )?;
            if updated != 1 {
                return Err(TicklistError::Storage(format!("checklist {} changed during update", name)));
            }
            tx.commit()?;
            (checklist, detail)
        };

        log::debug!("{} on {}/{} committed", action, owner, name);
        self.record(owner, name, action, detail);
        Ok(checklist)
    }
}

fn row_to_checklist(owner: &UserId, name: String, tasks_json: &str) -> Result<Checklist> {
    let tasks: Vec<Task> = serde_json::from_str(tasks_json)?;
    Ok(Checklist {
        name,
        owner: owner.clone(),
        tasks,
    })
}

impl ChecklistStore for SqliteStore {
    fn list_checklists(&self, owner: &UserId) -> Result<Vec<Checklist>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name, tasks FROM checklists WHERE owner = ?1 ORDER BY created_at, name")?;
        let rows = stmt.query_map([owner.as_str()], |row| {
            let name: String = row.get(0)?;
            let tasks: String = row.get(1)?;
            Ok((name, tasks))
        })?;

        let mut checklists = Vec::new();
        for row in rows {
            let (name, tasks) = row?;
            checklists.push(row_to_checklist(owner, name, &tasks)?);
        }
        Ok(checklists)
    }

    fn get_checklist(&self, owner: &UserId, name: &str) -> Result<Option<Checklist>> {
        let conn = self.lock()?;
        let tasks: Option<String> = conn
            .query_row(
                "SELECT tasks FROM checklists WHERE owner = ?1 AND name = ?2",
                params![owner.as_str(), name],
                |row| row.get(0),
            )
            .optional()?;

        tasks
            .map(|tasks| row_to_checklist(owner, name.to_string(), &tasks))
            .transpose()
    }

    fn create_checklist(&self, owner: &UserId, name: &str) -> Result<Checklist> {
        let name = normalize_checklist_name(name)?;
        let now = now_ms();
        {
            let conn = self.lock()?;
            let inserted = conn.execute(
                r#"
                INSERT INTO checklists (owner, name, tasks, version, created_at, updated_at)
                VALUES (?1, ?2, '[]', 1, ?3, ?3)
                "#,
                params![owner.as_str(), name, now],
            );
            match inserted {
                Ok(_) => {}
                Err(e) if is_constraint_violation(&e) => return Err(TicklistError::Conflict(name)),
                Err(e) => return Err(e.into()),
            }
        }

        log::debug!("create on {}/{} committed", owner, name);
        self.record(owner, &name, "create", Value::Null);
        Ok(Checklist::new(owner.clone(), name))
    }

    fn rename_checklist(&self, owner: &UserId, old_name: &str, new_name: &str) -> Result<Checklist> {
        let new_name = normalize_checklist_name(new_name)?;
        if new_name == old_name {
            return self
                .get_checklist(owner, old_name)?
                .ok_or_else(|| TicklistError::ChecklistNotFound(old_name.to_string()));
        }

        let checklist = {
            let mut conn = self.lock()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let renamed = tx.execute(
                r#"
                UPDATE checklists SET name = ?1, version = version + 1, updated_at = ?2
                WHERE owner = ?3 AND name = ?4
                "#,
                params![new_name, now_ms(), owner.as_str(), old_name],
            );
            match renamed {
                Ok(0) => return Err(TicklistError::ChecklistNotFound(old_name.to_string())),
                Ok(_) => {}
                Err(e) if is_constraint_violation(&e) => return Err(TicklistError::Conflict(new_name)),
                Err(e) => return Err(e.into()),
            }

            let tasks: String = tx.query_row(
                "SELECT tasks FROM checklists WHERE owner = ?1 AND name = ?2",
                params![owner.as_str(), new_name],
                |row| row.get(0),
            )?;
            tx.commit()?;
            row_to_checklist(owner, new_name.clone(), &tasks)?
        };

        log::debug!("rename on {}/{} -> {} committed", owner, old_name, new_name);
        self.record(owner, &new_name, "rename", json!({"from": old_name}));
        Ok(checklist)
    }

    fn delete_checklist(&self, owner: &UserId, name: &str) -> Result<()> {
        let deleted = {
            let conn = self.lock()?;
            conn.execute(
                "DELETE FROM checklists WHERE owner = ?1 AND name = ?2",
                params![owner.as_str(), name],
            )?
        };
        if deleted == 0 {
            return Err(TicklistError::ChecklistNotFound(name.to_string()));
        }

        log::debug!("delete on {}/{} committed", owner, name);
        self.record(owner, name, "delete", Value::Null);
        Ok(())
    }

    fn add_task(&self, owner: &UserId, name: &str, text: &str) -> Result<Checklist> {
        let text = normalize_task_text(text)?;
        self.mutate(owner, name, "add_task", |checklist| {
            checklist.add_task(&text)?;
            Ok(json!({"index": checklist.tasks.len() - 1, "text": text}))
        })
    }

    fn toggle_task(&self, owner: &UserId, name: &str, index: usize) -> Result<Checklist> {
        self.mutate(owner, name, "toggle_task", |checklist| {
            let done = checklist.toggle_task(index)?;
            Ok(json!({"index": index, "done": done}))
        })
    }

    fn edit_task(&self, owner: &UserId, name: &str, index: usize, text: &str) -> Result<Checklist> {
        let text = normalize_task_text(text)?;
        self.mutate(owner, name, "edit_task", |checklist| {
            checklist.edit_task(index, &text)?;
            Ok(json!({"index": index, "text": text}))
        })
    }

    fn delete_task(&self, owner: &UserId, name: &str, index: usize) -> Result<Checklist> {
        self.mutate(owner, name, "delete_task", |checklist| {
            let removed = checklist.delete_task(index)?;
            Ok(json!({"index": index, "text": removed.text}))
        })
    }
}
