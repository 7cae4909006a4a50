//! OAuth 2.0 authorization-code client for the external login provider
//!
//! Defaults are GitHub's endpoints; any provider with a JSON token endpoint
//! and a JSON profile endpoint exposing `id` plus `name`/`login` works.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::config::OAuthConfig;
use crate::domain::{User, UserId};
use crate::error::{Result, TicklistError};

/// Timeout for each call to the provider
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// OAuth client
pub struct OAuthClient {
    client: Client,
    config: OAuthConfig,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TicklistError::Auth(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// URL the browser is redirected to in order to sign in
    pub fn authorize_url(&self, state: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", self.config.scope.as_str()),
                ("state", state),
                ("response_type", "code"),
            ],
        )
        .map_err(|e| TicklistError::Config(format!("invalid auth.oauth.authorize_url: {}", e)))?;
        Ok(url.into())
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.config.token_url)
            .header("accept", "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TicklistError::Auth(format!("token endpoint returned {}: {}", status, body)));
        }

        let token: TokenResponse = response.json().await?;
        token_from_response(token)
    }

    /// Fetch the signed-in user's profile
    pub async fn fetch_user(&self, access_token: &str) -> Result<User> {
        let response = self
            .client
            .get(&self.config.user_url)
            .bearer_auth(access_token)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TicklistError::Auth(format!("profile endpoint returned {}", status)));
        }

        let profile: Value = response.json().await?;
        user_from_profile(&profile)
    }
}

fn token_from_response(token: TokenResponse) -> Result<String> {
    match token {
        TokenResponse {
            access_token: Some(access_token),
            ..
        } if !access_token.is_empty() => Ok(access_token),
        TokenResponse {
            error: Some(error),
            error_description,
            ..
        } => Err(TicklistError::Auth(match error_description {
            Some(description) => format!("{}: {}", error, description),
            None => error,
        })),
        _ => Err(TicklistError::Auth("token endpoint returned no access_token".to_string())),
    }
}

/// Map a provider profile to a `User`. The id may be a number or a string.
fn user_from_profile(profile: &Value) -> Result<User> {
    let id = match profile.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(TicklistError::Auth("profile has no usable id".to_string())),
    };

    let name = ["name", "login"]
        .iter()
        .filter_map(|field| profile.get(*field).and_then(Value::as_str))
        .find(|value| !value.trim().is_empty())
        .unwrap_or(id.as_str())
        .to_string();

    Ok(User::new(UserId::new(id), name))
}
