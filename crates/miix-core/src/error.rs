use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable credentials for the host; run a new grant.
    #[error("not authenticated; run `miix login`")]
    NoAuthentication,
    /// The short code's validity window elapsed before approval.
    #[error("short code expired")]
    ShortCodeExpired,
    #[error("grant cancelled")]
    GrantCancelled,
    #[error("unexpected response: {status} {body}")]
    UnexpectedResponse {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("expiry of {0} seconds is out of range")]
    ExpiryOutOfRange(i64),
    #[error("token has no refresh value and cannot be renewed")]
    MissingRefreshToken,
    #[error("error parsing profile from {path}: {source}")]
    MalformedProfile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error(transparent)]
    Serialize(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// Whether the remote rejected a refresh value as revoked or expired.
    #[must_use]
    pub fn is_invalid_grant(&self) -> bool {
        let AuthError::UnexpectedResponse { body, .. } = self else {
            return false;
        };
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|error| error.as_str())
                    .map(|error| error == "invalid_grant")
            })
            .unwrap_or(false)
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        AuthError::UnexpectedResponse { status, body }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
