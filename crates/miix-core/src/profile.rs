use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::client::{GrantApi, ShortCode};
use crate::constants::REQUIRED_SCOPES;
use crate::error::{AuthError, AuthResult};
use crate::notifier::GrantNotifier;
use crate::store::{HostProfile, ProfileStore, User};
use crate::token::Token;

/// Steps of a single [`Profile::grant`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantState {
    Idle,
    CodeRequested(ShortCode),
    AwaitingApproval(ShortCode),
    CodeExpiredRetry,
    Approved(Token),
    Cancelled,
}

impl GrantState {
    pub fn name(&self) -> &'static str {
        match self {
            GrantState::Idle => "idle",
            GrantState::CodeRequested(_) => "code_requested",
            GrantState::AwaitingApproval(_) => "awaiting_approval",
            GrantState::CodeExpiredRetry => "code_expired_retry",
            GrantState::Approved(_) => "approved",
            GrantState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GrantState::Approved(_) | GrantState::Cancelled)
    }
}

/// Credentials of one host, backed by the shared profile file.
///
/// Every operation takes `&mut self`, so a single instance never runs a grant
/// and a refresh at the same time. Separate processes writing the same file
/// are not coordinated; the last write wins.
pub struct Profile<C> {
    path: PathBuf,
    host: String,
    required_scopes: Vec<String>,
    client: C,
    store: ProfileStore,
}

impl<C: GrantApi> Profile<C> {
    pub fn new(path: impl Into<PathBuf>, host: impl Into<String>, client: C) -> Self {
        Self {
            path: path.into(),
            host: host.into(),
            required_scopes: REQUIRED_SCOPES.iter().map(|s| s.to_string()).collect(),
            client,
            store: ProfileStore::default(),
        }
    }

    #[must_use]
    pub fn with_required_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a valid token for the host, refreshing it first if it expired.
    pub async fn tokens(&mut self) -> AuthResult<Token> {
        Ok(self.ensure_profile().await?.tokens.clone())
    }

    /// Returns the user the host's credentials belong to.
    pub async fn user(&mut self) -> AuthResult<User> {
        Ok(self.ensure_profile().await?.userdata.clone())
    }

    /// Whether an unexpired token for the host exists. Never touches the network.
    pub fn has_authenticated(&mut self) -> AuthResult<bool> {
        if self.store.get(&self.host).is_none() {
            self.load()?;
        }
        Ok(self
            .store
            .get(&self.host)
            .is_some_and(|entry| !entry.tokens.is_expired(Utc::now())))
    }

    /// Forgets the host's credentials. Other hosts in the file are kept.
    pub fn logout(&mut self) -> AuthResult<()> {
        self.load()?;
        let mut updated = self.store.clone();
        let removed = updated.remove(&self.host).is_some();
        self.commit(updated)?;
        if removed {
            info!(host = %self.host, "logged out");
        }
        Ok(())
    }

    /// Runs the short code flow until the operator approves a code or the
    /// notifier cancels, then stores the new credentials for the host.
    pub async fn grant<N>(&mut self, notifier: &N) -> AuthResult<Token>
    where
        N: GrantNotifier + ?Sized,
    {
        self.load()?;

        let mut state = GrantState::Idle;
        let token = loop {
            state = match state {
                GrantState::Approved(token) => break token,
                GrantState::Cancelled => return Err(AuthError::GrantCancelled),
                state => self.advance_grant(state, notifier).await?,
            };
        };

        let userdata = self.client.current_user(&token).await?;
        info!(host = %self.host, user = %userdata.username, "access granted");
        let mut updated = self.store.clone();
        updated.insert(
            self.host.clone(),
            HostProfile {
                tokens: token.clone(),
                userdata,
            },
        );
        self.commit(updated)?;
        Ok(token)
    }

    /// Moves the grant one step forward. Cancellation is read only on the way
    /// to a new code request.
    pub async fn advance_grant<N>(&self, state: GrantState, notifier: &N) -> AuthResult<GrantState>
    where
        N: GrantNotifier + ?Sized,
    {
        let next = match state {
            GrantState::Idle | GrantState::CodeExpiredRetry => {
                if notifier.is_cancelled() {
                    GrantState::Cancelled
                } else {
                    GrantState::CodeRequested(self.client.request_code().await?)
                }
            }
            GrantState::CodeRequested(code) => {
                notifier.prompt(&code.code);
                GrantState::AwaitingApproval(code)
            }
            GrantState::AwaitingApproval(code) => match self.client.await_approval(&code).await {
                Ok(token) => GrantState::Approved(token),
                Err(AuthError::ShortCodeExpired) => GrantState::CodeExpiredRetry,
                Err(err) => return Err(err),
            },
            terminal @ (GrantState::Approved(_) | GrantState::Cancelled) => terminal,
        };
        debug!(state = next.name(), "grant state");
        Ok(next)
    }

    async fn ensure_profile(&mut self) -> AuthResult<&HostProfile> {
        if self.store.get(&self.host).is_none() {
            self.load()?;
        }
        let current = match self.store.get(&self.host) {
            Some(entry) => entry.tokens.clone(),
            None => return Err(AuthError::NoAuthentication),
        };

        if !current.has_scopes(self.required_scopes.as_slice()) {
            debug!(host = %self.host, "stored token is missing required scopes");
            return Err(AuthError::NoAuthentication);
        }

        if current.is_expired(Utc::now()) {
            self.refresh(&current).await?;
        }

        self.store
            .get(&self.host)
            .ok_or(AuthError::NoAuthentication)
    }

    async fn refresh(&mut self, current: &Token) -> AuthResult<()> {
        let refreshed = match self.client.refresh(current).await {
            Ok(token) => token,
            Err(err) if err.is_invalid_grant() => {
                warn!(host = %self.host, "refresh grant rejected; login required");
                return Err(AuthError::NoAuthentication);
            }
            Err(err) => return Err(err),
        };

        let mut updated = self.store.clone();
        let Some(entry) = updated.hosts.get_mut(&self.host) else {
            return Err(AuthError::NoAuthentication);
        };
        entry.tokens = refreshed;
        self.commit(updated)?;
        info!(host = %self.host, "refreshed access token");
        Ok(())
    }

    fn load(&mut self) -> AuthResult<()> {
        self.store = ProfileStore::load(&self.path)?;
        Ok(())
    }

    /// Writes `updated` to disk and adopts it only once the write succeeded.
    fn commit(&mut self, updated: ProfileStore) -> AuthResult<()> {
        updated.save(&self.path)?;
        self.store = updated;
        Ok(())
    }
}
