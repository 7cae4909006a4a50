//! Request extractors that reject with `TicklistError`.

use async_trait::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;

use crate::api::AppState;
use crate::auth::cookies::read_cookie;
use crate::domain::User;
use crate::error::TicklistError;

/// JSON body; malformed or incomplete payloads become `BadRequest`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(TicklistError))]
pub struct JsonBody<T>(pub T);

/// Path parameters; unparseable segments (e.g. a non-numeric index) become `BadRequest`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(TicklistError))]
pub struct ApiPath<T>(pub T);

/// Query string; malformed queries become `BadRequest`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(TicklistError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for TicklistError {
    fn from(rejection: JsonRejection) -> Self {
        TicklistError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for TicklistError {
    fn from(rejection: PathRejection) -> Self {
        TicklistError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for TicklistError {
    fn from(rejection: QueryRejection) -> Self {
        TicklistError::BadRequest(rejection.body_text())
    }
}

/// The signed-in user, resolved from the session cookie.
///
/// Handlers take the owner from here and only from here.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = TicklistError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, &state.auth.cookie_name)
            .ok_or(TicklistError::Unauthorized)?
            .to_string();

        let user = state
            .with_sessions(move |sessions| sessions.lookup(&token))
            .await?
            .ok_or(TicklistError::Unauthorized)?;

        Ok(CurrentUser(user))
    }
}
