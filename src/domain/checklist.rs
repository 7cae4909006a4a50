//! Checklist and task types
//!
//! A checklist is a named, owner-scoped, ordered sequence of tasks. Tasks have
//! no identity of their own: index `i` is always the `i`-th live task, so a
//! delete renumbers everything after it. Positional addressing is only safe
//! when one client edits a checklist at a time.

use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::error::{Result, TicklistError};

/// A single checklist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    pub done: bool,
}

impl Task {
    /// Create an open task from user-supplied text (trimmed, must be non-empty)
    pub fn new(text: &str) -> Result<Self> {
        Ok(Self {
            text: normalize_task_text(text)?,
            done: false,
        })
    }
}

/// A named list of tasks belonging to one owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub name: String,
    pub owner: UserId,
    pub tasks: Vec<Task>,
}

impl Checklist {
    /// Create an empty checklist. `name` is expected to be normalized already.
    pub fn new(owner: UserId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner,
            tasks: Vec::new(),
        }
    }

    /// Append a new open task
    pub fn add_task(&mut self, text: &str) -> Result<&Task> {
        let task = Task::new(text)?;
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Flip the `done` flag of the task at `index`, returning the new value
    pub fn toggle_task(&mut self, index: usize) -> Result<bool> {
        let task = self.task_mut(index)?;
        task.done = !task.done;
        Ok(task.done)
    }

    /// Replace the text of the task at `index`
    pub fn edit_task(&mut self, index: usize, text: &str) -> Result<()> {
        let text = normalize_task_text(text)?;
        self.task_mut(index)?.text = text;
        Ok(())
    }

    /// Remove the task at `index`; later tasks shift down by one
    pub fn delete_task(&mut self, index: usize) -> Result<Task> {
        self.check_index(index)?;
        Ok(self.tasks.remove(index))
    }

    fn task_mut(&mut self, index: usize) -> Result<&mut Task> {
        self.check_index(index)?;
        Ok(&mut self.tasks[index])
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(TicklistError::TaskNotFound {
                checklist: self.name.clone(),
                index: index.to_string(),
            })
        }
    }
}

/// Trim a checklist name, rejecting names that are blank
pub fn normalize_checklist_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TicklistError::InvalidInput("checklist name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trim task text, rejecting text that is blank
pub fn normalize_task_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TicklistError::InvalidInput("task text must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist_with(texts: &[&str]) -> Checklist {
        let mut checklist = Checklist::new(UserId::new("u1"), "Groceries");
        for text in texts {
            checklist.add_task(text).unwrap();
        }
        checklist
    }

    #[test]
    fn test_new_checklist_is_empty() {
        let checklist = Checklist::new(UserId::new("u1"), "Trip");
        assert_eq!(checklist.name, "Trip");
        assert!(checklist.tasks.is_empty());
    }

    #[test]
    fn test_add_task_trims_and_starts_open() {
        let mut checklist = checklist_with(&[]);
        let task = checklist.add_task("  buy milk  ").unwrap();
        assert_eq!(task.text, "buy milk");
        assert!(!task.done);
    }

    #[test]
    fn test_add_blank_task_is_invalid_input() {
        let mut checklist = checklist_with(&[]);
        let err = checklist.add_task("   ").unwrap_err();
        assert!(matches!(err, TicklistError::InvalidInput(_)));
        assert!(checklist.tasks.is_empty());
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let mut checklist = checklist_with(&["a"]);
        assert!(checklist.toggle_task(0).unwrap());
        assert!(!checklist.toggle_task(0).unwrap());
        assert!(!checklist.tasks[0].done);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut checklist = checklist_with(&["a"]);
        let err = checklist.toggle_task(1).unwrap_err();
        assert!(matches!(err, TicklistError::TaskNotFound { ref index, .. } if index == "1"));
    }

    #[test]
    fn test_edit_task_replaces_text() {
        let mut checklist = checklist_with(&["a", "b"]);
        checklist.edit_task(1, " bee ").unwrap();
        assert_eq!(checklist.tasks[1].text, "bee");
        assert_eq!(checklist.tasks[0].text, "a");
    }

    #[test]
    fn test_edit_task_blank_text_is_rejected_before_bounds() {
        let mut checklist = checklist_with(&["a"]);
        let err = checklist.edit_task(9, "").unwrap_err();
        assert!(matches!(err, TicklistError::InvalidInput(_)));
    }

    #[test]
    fn test_delete_task_shifts_later_indices() {
        let mut checklist = checklist_with(&["a", "b", "c", "d"]);
        checklist.toggle_task(3).unwrap();

        let removed = checklist.delete_task(1).unwrap();
        assert_eq!(removed.text, "b");

        let texts: Vec<_> = checklist.tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c", "d"]);
        assert!(checklist.tasks[2].done);
    }

    #[test]
    fn test_delete_task_on_empty_checklist() {
        let mut checklist = checklist_with(&[]);
        assert!(checklist.delete_task(0).is_err());
    }

    #[test]
    fn test_normalize_checklist_name() {
        assert_eq!(normalize_checklist_name("  Trip ").unwrap(), "Trip");
        assert!(normalize_checklist_name(" \t ").is_err());
    }

    #[test]
    fn test_checklist_serialization_shape() {
        let mut checklist = Checklist::new(UserId::new("u1"), "Trip");
        checklist.add_task("Pack bags").unwrap();
        checklist.toggle_task(0).unwrap();

        let value = serde_json::to_value(&checklist).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Trip",
                "owner": "u1",
                "tasks": [{"text": "Pack bags", "done": true}]
            })
        );
    }
}
