//! Checklist store contract tests
//!
//! Exercises the store through the `ChecklistStore` trait against a real
//! database file, the way the server uses it.

use ticklist::domain::{Task, UserId};
use ticklist::error::{ErrorKind, Result, TicklistError};
use ticklist::store::{ChecklistStore, DEFAULT_BUSY_TIMEOUT, SqliteStore};
use tempfile::TempDir;

fn open_store(temp_dir: &TempDir) -> Result<Box<dyn ChecklistStore>> {
    let store = SqliteStore::open(temp_dir.path().join("ticklist.db"), DEFAULT_BUSY_TIMEOUT)?;
    Ok(Box::new(store))
}

fn u1() -> UserId {
    UserId::new("u1")
}

fn u2() -> UserId {
    UserId::new("u2")
}

fn texts(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.text.as_str()).collect()
}

/// Another owner can neither see nor touch a checklist
#[test]
fn test_owner_isolation() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;

    store.create_checklist(&u1(), "Groceries")?;
    store.add_task(&u1(), "Groceries", "Milk")?;

    assert!(store.list_checklists(&u2())?.is_empty());
    assert!(store.get_checklist(&u2(), "Groceries")?.is_none());

    let attempts = [
        store.add_task(&u2(), "Groceries", "Eggs").map(|_| ()),
        store.toggle_task(&u2(), "Groceries", 0).map(|_| ()),
        store.edit_task(&u2(), "Groceries", 0, "Beer").map(|_| ()),
        store.delete_task(&u2(), "Groceries", 0).map(|_| ()),
        store.rename_checklist(&u2(), "Groceries", "Mine").map(|_| ()),
        store.delete_checklist(&u2(), "Groceries"),
    ];
    for attempt in attempts {
        let err = attempt.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "unexpected error: {}", err);
    }

    let untouched = store.get_checklist(&u1(), "Groceries")?.unwrap();
    assert_eq!(untouched.tasks, vec![Task::new("Milk")?]);
    Ok(())
}

#[test]
fn test_duplicate_name_conflicts_only_for_same_owner() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;

    store.create_checklist(&u1(), "Trip")?;
    assert!(matches!(
        store.create_checklist(&u1(), "Trip"),
        Err(TicklistError::Conflict(_))
    ));
    assert!(matches!(
        store.create_checklist(&u1(), "  Trip "),
        Err(TicklistError::Conflict(_))
    ));

    let other = store.create_checklist(&u2(), "Trip")?;
    assert_eq!(other.owner, u2());
    Ok(())
}

#[test]
fn test_toggle_twice_restores_done() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;

    store.create_checklist(&u1(), "Chores")?;
    store.add_task(&u1(), "Chores", "Dishes")?;
    store.add_task(&u1(), "Chores", "Laundry")?;

    let once = store.toggle_task(&u1(), "Chores", 1)?;
    assert!(once.tasks[1].done);
    assert!(!once.tasks[0].done);

    let twice = store.toggle_task(&u1(), "Chores", 1)?;
    assert!(!twice.tasks[1].done);
    Ok(())
}

#[test]
fn test_delete_task_shifts_later_tasks() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;

    store.create_checklist(&u1(), "Steps")?;
    for text in ["a", "b", "c", "d"] {
        store.add_task(&u1(), "Steps", text)?;
    }
    store.toggle_task(&u1(), "Steps", 3)?;

    let after = store.delete_task(&u1(), "Steps", 1)?;
    assert_eq!(texts(&after.tasks), vec!["a", "c", "d"]);
    assert!(after.tasks[2].done);

    let err = store.delete_task(&u1(), "Steps", 3).unwrap_err();
    assert!(matches!(err, TicklistError::TaskNotFound { ref index, .. } if index == "3"));
    Ok(())
}

#[test]
fn test_task_text_is_trimmed_and_required() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;

    store.create_checklist(&u1(), "Shopping")?;
    let err = store.add_task(&u1(), "Shopping", "  ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let checklist = store.add_task(&u1(), "Shopping", "  buy milk  ")?;
    assert_eq!(texts(&checklist.tasks), vec!["buy milk"]);

    let edited = store.edit_task(&u1(), "Shopping", 0, "\tbuy oat milk\n")?;
    assert_eq!(texts(&edited.tasks), vec!["buy oat milk"]);
    assert!(store.edit_task(&u1(), "Shopping", 0, "").is_err());
    Ok(())
}

#[test]
fn test_trip_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;

    store.create_checklist(&u1(), "Trip")?;
    store.add_task(&u1(), "Trip", "Pack bags")?;
    let checklist = store.toggle_task(&u1(), "Trip", 0)?;

    let json = serde_json::to_value(&checklist)?;
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Trip",
            "owner": "u1",
            "tasks": [{"text": "Pack bags", "done": true}]
        })
    );
    Ok(())
}

#[test]
fn test_rename_onto_existing_name_conflicts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;

    store.create_checklist(&u1(), "Trip")?;
    store.add_task(&u1(), "Trip", "Pack bags")?;
    store.create_checklist(&u1(), "Vacation")?;

    let err = store.rename_checklist(&u1(), "Trip", "Vacation").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let trip = store.get_checklist(&u1(), "Trip")?.unwrap();
    assert_eq!(texts(&trip.tasks), vec!["Pack bags"]);
    assert!(store.get_checklist(&u1(), "Vacation")?.unwrap().tasks.is_empty());
    Ok(())
}

#[test]
fn test_rename_moves_checklist() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;

    store.create_checklist(&u1(), "Trip")?;
    store.add_task(&u1(), "Trip", "Pack bags")?;

    let renamed = store.rename_checklist(&u1(), "Trip", " Vacation ")?;
    assert_eq!(renamed.name, "Vacation");
    assert!(store.get_checklist(&u1(), "Trip")?.is_none());

    // The new name can host further task operations
    let updated = store.add_task(&u1(), "Vacation", "Book hotel")?;
    assert_eq!(texts(&updated.tasks), vec!["Pack bags", "Book hotel"]);
    Ok(())
}

#[test]
fn test_delete_checklist_frees_name() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir)?;

    store.create_checklist(&u1(), "Trip")?;
    store.add_task(&u1(), "Trip", "Pack bags")?;
    store.delete_checklist(&u1(), "Trip")?;

    let recreated = store.create_checklist(&u1(), "Trip")?;
    assert!(recreated.tasks.is_empty());
    Ok(())
}
