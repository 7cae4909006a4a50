//! Checklist and task handlers.
//!
//! Mutations answer with the full checklist as stored after the change so
//! clients can re-render without a second fetch.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api::AppState;
use crate::api::dto::{CreateChecklistRequest, OkResponse, RenameChecklistRequest, TaskTextRequest};
use crate::api::extract::{ApiPath, CurrentUser, JsonBody};
use crate::domain::{Checklist, normalize_task_text};
use crate::error::{Result, TicklistError};

pub async fn list(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> Result<Json<Vec<Checklist>>> {
    let owner = user.id;
    let checklists = state.with_store(move |store| store.list_checklists(&owner)).await?;
    Ok(Json(checklists))
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(req): JsonBody<CreateChecklistRequest>,
) -> Result<(StatusCode, Json<Checklist>)> {
    let owner = user.id;
    let checklist = state
        .with_store(move |store| store.create_checklist(&owner, &req.name))
        .await?;
    tracing::info!(owner = %checklist.owner, checklist = %checklist.name, "checklist created");
    Ok((StatusCode::CREATED, Json(checklist)))
}

pub async fn rename(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(name): ApiPath<String>,
    JsonBody(req): JsonBody<RenameChecklistRequest>,
) -> Result<Json<Checklist>> {
    let owner = user.id;
    let from = name.clone();
    let checklist = state
        .with_store(move |store| store.rename_checklist(&owner, &from, &req.new_name))
        .await?;
    tracing::info!(owner = %checklist.owner, from = %name, to = %checklist.name, "checklist renamed");
    Ok(Json(checklist))
}

pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(name): ApiPath<String>,
) -> Result<Json<OkResponse>> {
    let owner = user.id.clone();
    let target = name.clone();
    state
        .with_store(move |store| store.delete_checklist(&owner, &target))
        .await?;
    tracing::info!(owner = %user.id, checklist = %name, "checklist deleted");
    Ok(Json(OkResponse { ok: true }))
}

pub async fn add_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(name): ApiPath<String>,
    JsonBody(req): JsonBody<TaskTextRequest>,
) -> Result<Json<Checklist>> {
    let owner = user.id;
    let checklist = state
        .with_store(move |store| store.add_task(&owner, &name, &req.text))
        .await?;
    tracing::debug!(checklist = %checklist.name, tasks = checklist.tasks.len(), "task added");
    Ok(Json(checklist))
}

/// Parse a `:index` segment.
///
/// Anything that is not an integer is `BadRequest`. Integers that cannot
/// address a task (negative, or beyond `usize`) are `TaskNotFound`, the same
/// as any other index outside the checklist's range.
pub(crate) fn parse_task_index(checklist: &str, raw: &str) -> Result<usize> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TicklistError::BadRequest(format!("task index must be an integer: {}", raw)));
    }

    let not_found = || TicklistError::TaskNotFound {
        checklist: checklist.to_string(),
        index: raw.to_string(),
    };
    match digits.parse::<usize>() {
        Ok(0) => Ok(0),
        Ok(_) if negative => Err(not_found()),
        Ok(index) => Ok(index),
        Err(_) => Err(not_found()),
    }
}

/// Flip the done flag; any request body is ignored
pub async fn toggle_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath((name, raw_index)): ApiPath<(String, String)>,
) -> Result<Json<Checklist>> {
    let index = parse_task_index(&name, &raw_index)?;
    let owner = user.id;
    let checklist = state
        .with_store(move |store| store.toggle_task(&owner, &name, index))
        .await?;
    tracing::debug!(checklist = %checklist.name, index, "task toggled");
    Ok(Json(checklist))
}

pub async fn edit_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath((name, raw_index)): ApiPath<(String, String)>,
    JsonBody(req): JsonBody<TaskTextRequest>,
) -> Result<Json<Checklist>> {
    // Blank text outranks a bad index
    normalize_task_text(&req.text)?;
    let index = parse_task_index(&name, &raw_index)?;
    let owner = user.id;
    let checklist = state
        .with_store(move |store| store.edit_task(&owner, &name, index, &req.text))
        .await?;
    tracing::debug!(checklist = %checklist.name, index, "task edited");
    Ok(Json(checklist))
}

pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath((name, raw_index)): ApiPath<(String, String)>,
) -> Result<Json<Checklist>> {
    let index = parse_task_index(&name, &raw_index)?;
    let owner = user.id;
    let checklist = state
        .with_store(move |store| store.delete_task(&owner, &name, index))
        .await?;
    tracing::debug!(checklist = %checklist.name, index, "task deleted");
    Ok(Json(checklist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_task_index_accepts_indexes() {
        assert_eq!(parse_task_index("Trip", "0").unwrap(), 0);
        assert_eq!(parse_task_index("Trip", "17").unwrap(), 17);
        assert_eq!(parse_task_index("Trip", "-0").unwrap(), 0);
    }

    #[test]
    fn test_parse_task_index_rejects_non_integers() {
        for raw in ["abc", "", "-", "1.5", "+1", " 1", "0x1"] {
            let err = parse_task_index("Trip", raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest, "index {:?}", raw);
        }
    }

    #[test]
    fn test_parse_task_index_unaddressable_is_not_found() {
        for raw in ["-1", "-42", "18446744073709551616", "99999999999999999999999999999999999999999"] {
            let err = parse_task_index("Trip", raw).unwrap_err();
            assert!(
                matches!(err, TicklistError::TaskNotFound { ref index, .. } if index == raw),
                "index {:?}: {}",
                raw,
                err
            );
        }
    }
}
