//! Request and response payloads.

use serde::{Deserialize, Serialize};

use crate::domain::User;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateChecklistRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameChecklistRequest {
    pub new_name: String,
}

/// Body of add-task and edit-task
#[derive(Debug, Clone, Deserialize)]
pub struct TaskTextRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Query string of the OAuth callback
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
