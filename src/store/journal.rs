//! Append-only JSONL audit journal of checklist mutations.
//!
//! One line per committed mutation. The database stays the source of truth;
//! the journal is a history for humans and tooling.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::UserId;
use crate::error::Result;
use crate::id::now_ms;

/// A single journal line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Commit time in ms since epoch
    pub at: i64,
    pub owner: UserId,
    /// Checklist name after the mutation
    pub checklist: String,
    pub action: String,
    #[serde(default)]
    pub detail: Value,
}

impl JournalEntry {
    pub fn new(owner: &UserId, checklist: &str, action: &str, detail: Value) -> Self {
        Self {
            at: now_ms(),
            owner: owner.clone(),
            checklist: checklist.to_string(),
            action: action.to_string(),
            detail,
        }
    }
}

/// JSONL journal writer
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    /// Create a journal at `path`, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single line.
    ///
    /// The line and its newline go out in one `write_all` on an `O_APPEND`
    /// handle so concurrent appenders never split a record.
    pub fn append(&self, entry: &JournalEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
