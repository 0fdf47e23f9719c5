use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_CLIENT_ID, DEFAULT_HOST, DEFAULT_POLL_INTERVAL, REQUIRED_SCOPES};
use crate::error::{AuthError, AuthResult};
use crate::store::User;
use crate::token::Token;

/// Settings for talking to the authorization endpoints of one host.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub client_id: String,
    pub scopes: Vec<String>,
    /// Used when the service does not advertise its own poll interval.
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            scopes: REQUIRED_SCOPES.iter().map(|s| s.to_string()).collect(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// A short code issued by the service, plus what is needed to poll for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortCode {
    pub code: String,
    pub handle: String,
    pub expires_at: DateTime<Utc>,
    pub interval: Duration,
}

/// Network side of the credential lifecycle.
#[async_trait]
pub trait GrantApi: Send + Sync {
    async fn request_code(&self) -> AuthResult<ShortCode>;

    /// Resolves once the code is approved. Fails with
    /// [`AuthError::ShortCodeExpired`] when the validity window elapses first.
    async fn await_approval(&self, code: &ShortCode) -> AuthResult<Token>;

    async fn refresh(&self, token: &Token) -> AuthResult<Token>;

    async fn current_user(&self, token: &Token) -> AuthResult<User>;
}

#[derive(Serialize)]
struct ShortCodeRequest<'a> {
    client_id: &'a str,
    scope: String,
}

#[derive(Deserialize)]
struct ShortCodeResponse {
    code: String,
    handle: String,
    expires_in: i64,
    #[serde(default)]
    interval: Option<u64>,
}

#[derive(Deserialize)]
struct ShortCodeCheckResponse {
    code: String,
}

#[derive(Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
enum TokenRequest<'a> {
    AuthorizationCode {
        client_id: &'a str,
        code: &'a str,
    },
    RefreshToken {
        client_id: &'a str,
        refresh_token: &'a str,
    },
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
    #[serde(default)]
    scope: Option<String>,
}

#[derive(Deserialize)]
struct CurrentUserResponse {
    id: u64,
    username: String,
    channel: ChannelRef,
}

#[derive(Deserialize)]
struct ChannelRef {
    id: u64,
}

/// Absolute expiry for a lifetime in seconds reported by the service.
fn expires_after(expires_in: i64) -> AuthResult<DateTime<Utc>> {
    ChronoDuration::try_seconds(expires_in)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or(AuthError::ExpiryOutOfRange(expires_in))
}

/// [`GrantApi`] over the service's short code OAuth endpoints.
pub struct ShortCodeClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ShortCodeClient {
    pub fn new(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), path)
    }

    fn granted_scopes(&self, scope: Option<&str>) -> BTreeSet<String> {
        match scope {
            Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
            None => self.config.scopes.iter().cloned().collect(),
        }
    }

    async fn post_token(&self, request: &TokenRequest<'_>) -> AuthResult<TokenResponse> {
        let url = self.url("/oauth/token");
        debug!(url = %url, "token exchange");
        let response = self.http.post(url).json(request).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::from_response(response).await);
        }
        Ok(response.json::<TokenResponse>().await?)
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<Token> {
        let request = TokenRequest::AuthorizationCode {
            client_id: &self.config.client_id,
            code,
        };
        let response = self.post_token(&request).await?;
        Ok(Token {
            scopes: self.granted_scopes(response.scope.as_deref()),
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: expires_after(response.expires_in)?,
        })
    }
}

#[async_trait]
impl GrantApi for ShortCodeClient {
    async fn request_code(&self) -> AuthResult<ShortCode> {
        let url = self.url("/oauth/shortcode");
        let payload = ShortCodeRequest {
            client_id: &self.config.client_id,
            scope: self.config.scopes.join(" "),
        };
        debug!(url = %url, "requesting short code");
        let response = self.http.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::from_response(response).await);
        }
        let body: ShortCodeResponse = response.json().await?;
        Ok(ShortCode {
            code: body.code,
            handle: body.handle,
            expires_at: expires_after(body.expires_in)?,
            interval: body
                .interval
                .map(Duration::from_secs)
                .unwrap_or(self.config.poll_interval),
        })
    }

    async fn await_approval(&self, code: &ShortCode) -> AuthResult<Token> {
        let url = self.url(&format!("/oauth/shortcode/check/{}", code.handle));
        loop {
            if Utc::now() >= code.expires_at {
                return Err(AuthError::ShortCodeExpired);
            }

            let response = self.http.get(&url).send().await?;
            debug!(url = %url, status = %response.status(), "short code check");
            match response.status() {
                StatusCode::OK => {
                    let check: ShortCodeCheckResponse = response.json().await?;
                    return self.exchange_code(&check.code).await;
                }
                StatusCode::NO_CONTENT => tokio::time::sleep(code.interval).await,
                StatusCode::NOT_FOUND => return Err(AuthError::ShortCodeExpired),
                _ => return Err(AuthError::from_response(response).await),
            }
        }
    }

    async fn refresh(&self, token: &Token) -> AuthResult<Token> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or(AuthError::MissingRefreshToken)?;
        let request = TokenRequest::RefreshToken {
            client_id: &self.config.client_id,
            refresh_token,
        };
        let response = self.post_token(&request).await?;
        let scopes = match response.scope.as_deref() {
            Some(scope) => self.granted_scopes(Some(scope)),
            None => token.scopes.clone(),
        };
        Ok(token.refreshed_with(
            response.access_token,
            response.refresh_token,
            expires_after(response.expires_in)?,
            scopes,
        ))
    }

    async fn current_user(&self, token: &Token) -> AuthResult<User> {
        let url = self.url("/users/current");
        let response = self
            .http
            .get(url)
            .query(&[("fields", "id,username,channel")])
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::from_response(response).await);
        }
        let body: CurrentUserResponse = response.json().await?;
        Ok(User {
            id: body.id,
            username: body.username,
            channel: body.channel.id,
        })
    }
}
