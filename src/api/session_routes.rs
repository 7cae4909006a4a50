//! Sign-in, sign-out and identity routes

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Redirect, Response};

use crate::api::AppState;
use crate::api::dto::{CallbackParams, MeResponse};
use crate::api::extract::{ApiQuery, CurrentUser};
use crate::auth::cookies::{clear_cookie, read_cookie, set_cookie};
use crate::auth::{OAUTH_STATE_COOKIE, OAUTH_STATE_MAX_AGE_SECS};
use crate::error::{Result, TicklistError};
use crate::id::generate_token;

fn append_cookie(response: &mut Response, cookie: &str) -> Result<()> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| TicklistError::Config(format!("invalid Set-Cookie value: {}", e)))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}

pub async fn login(State(state): State<AppState>) -> Result<Response> {
    let oauth = state.oauth.as_ref().ok_or(TicklistError::LoginUnavailable)?;

    let csrf_state = generate_token();
    let location = oauth.authorize_url(&csrf_state)?;

    let mut response = Redirect::to(&location).into_response();
    append_cookie(
        &mut response,
        &set_cookie(
            OAUTH_STATE_COOKIE,
            &csrf_state,
            OAUTH_STATE_MAX_AGE_SECS,
            state.auth.secure_cookies,
        ),
    )?;
    Ok(response)
}

pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<CallbackParams>,
) -> Result<Response> {
    let oauth = state.oauth.clone().ok_or(TicklistError::LoginUnavailable)?;

    if let Some(error) = params.error {
        return Err(TicklistError::BadRequest(format!("login was not completed: {}", error)));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| TicklistError::BadRequest("missing authorization code".to_string()))?;

    let expected = read_cookie(&headers, OAUTH_STATE_COOKIE)
        .ok_or_else(|| TicklistError::BadRequest("missing login state".to_string()))?;
    if params.state.as_deref() != Some(expected) {
        return Err(TicklistError::BadRequest("login state mismatch".to_string()));
    }

    let access_token = oauth.exchange_code(&code).await?;
    let user = oauth.fetch_user(&access_token).await?;

    let session_user = user.clone();
    let token = state
        .with_sessions(move |sessions| sessions.create(&session_user))
        .await?;
    tracing::info!(user_id = %user.id, "signed in");

    let secure = state.auth.secure_cookies;
    let max_age = state.sessions.ttl().num_seconds();
    let mut response = Redirect::to("/").into_response();
    append_cookie(&mut response, &set_cookie(&state.auth.cookie_name, &token, max_age, secure))?;
    append_cookie(&mut response, &clear_cookie(OAUTH_STATE_COOKIE, secure))?;
    Ok(response)
}

/// Revoke the session (if any) and clear the cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if let Some(token) = read_cookie(&headers, &state.auth.cookie_name).map(str::to_string) {
        let revoked = state.with_sessions(move |sessions| sessions.revoke(&token)).await?;
        if revoked {
            tracing::info!("signed out");
        }
    }

    let mut response = Redirect::to("/").into_response();
    append_cookie(
        &mut response,
        &clear_cookie(&state.auth.cookie_name, state.auth.secure_cookies),
    )?;
    Ok(response)
}
