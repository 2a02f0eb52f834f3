//! Session Manager
//!
//! Owns the token lifecycle for one client:
//!
//! ```text
//!            ensure_token()                 handshake ok
//! NoToken ──────────────────▶ Acquiring ─────────────────▶ Ready(token)
//!    ▲                            │
//!    │ invalidate()               │ challenge body
//!    │                            ▼
//!    └──────────────────── ChallengePending(payload)
//! ```
//!
//! A token is taken, in order, from the held state, from an unexpired
//! `JSESSIONID` cookie in the jar, or from a credential handshake. Each call
//! performs at most one handshake; failures are classified, never retried.
//! The pre-login cookie left behind by a failed handshake is never promoted
//! to a token; only a different cookie (set out-of-band) resumes the session.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use voyager_core::CookieSource;
use voyager_domain::constants::{
    API_REQUEST_HEADERS, AUTH_REQUEST_HEADERS, CSRF_TOKEN_HEADER, SESSION_COOKIE_NAME,
};
use voyager_domain::{
    ChallengePayload, ClientConfig, Credentials, CsrfToken, HeaderList, RequestBody,
    RequestDescriptor, SessionIdentity, SessionState,
};

use super::errors::ApiError;
use super::executor::{ExecutorResponse, RequestExecutor};

/// Source of the CSRF token attached to authenticated calls.
///
/// Allows the resource layer to be driven by a fixed token in tests.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a usable token, acquiring one if needed.
    async fn access_token(&self) -> Result<CsrfToken, ApiError>;
}

/// Apply the desktop header set and `csrf-token` to a descriptor.
///
/// Headers already on the descriptor take precedence.
pub fn with_api_headers(descriptor: RequestDescriptor, token: &CsrfToken) -> RequestDescriptor {
    let mut headers: HeaderList = API_REQUEST_HEADERS.iter().copied().collect();
    headers.insert(CSRF_TOKEN_HEADER, token.as_str());
    for (name, value) in descriptor.headers.iter() {
        headers.insert(name, value);
    }
    RequestDescriptor { headers, ..descriptor }
}

/// Token state machine plus lazily resolved identity for one client.
pub struct SessionManager {
    executor: Arc<RequestExecutor>,
    cookies: Arc<dyn CookieSource>,
    credentials: Option<Credentials>,
    auth_url: String,
    auth_domain: String,
    base_url: String,
    state: RwLock<SessionState>,
    identity: RwLock<SessionIdentity>,
    rejected_cookie: RwLock<Option<String>>,
    acquisition: Mutex<()>,
}

impl SessionManager {
    /// Create a manager in the `NoToken` state.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configured auth URL has no host.
    pub fn new(
        config: &ClientConfig,
        executor: Arc<RequestExecutor>,
        cookies: Arc<dyn CookieSource>,
        credentials: Option<Credentials>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            executor,
            cookies,
            credentials,
            auth_url: config.auth_url.clone(),
            auth_domain: config.auth_domain()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            state: RwLock::new(SessionState::NoToken),
            identity: RwLock::new(SessionIdentity::default()),
            rejected_cookie: RwLock::new(None),
            acquisition: Mutex::new(()),
        })
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Account identifiers resolved by [`initialize`](Self::initialize).
    pub fn identity(&self) -> SessionIdentity {
        self.identity.read().clone()
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Drop the held token (or pending challenge) and return to `NoToken`.
    pub fn invalidate(&self) {
        let previous = std::mem::take(&mut *self.state.write());
        info!(previous = previous.label(), "session invalidated");
    }

    /// Return a usable token, acquiring one if none is held.
    ///
    /// # Errors
    ///
    /// - `ChallengeRequired` when the handshake (now or earlier) was answered
    ///   with a challenge that has not been resolved
    /// - `CredentialsRequired` when there is no cookie and no credentials
    /// - the handshake's own classified failure otherwise
    #[instrument(skip(self))]
    pub async fn ensure_token(&self) -> Result<CsrfToken, ApiError> {
        if let Some(token) = self.held_token() {
            return Ok(token);
        }

        let _guard = self.acquisition.lock().await;
        if let Some(token) = self.held_token() {
            return Ok(token);
        }

        if let Some(token) = self.token_from_cookie() {
            debug!("session token taken from existing cookie");
            *self.state.write() = SessionState::Ready(token.clone());
            return Ok(token);
        }

        if let SessionState::ChallengePending(payload) = self.state() {
            return Err(ApiError::ChallengeRequired(payload));
        }

        let Some(credentials) = self.credentials.as_ref() else {
            return Err(ApiError::CredentialsRequired);
        };

        *self.state.write() = SessionState::Acquiring;
        match self.handshake(credentials).await {
            Ok(token) => {
                info!("session token acquired");
                *self.rejected_cookie.write() = None;
                *self.state.write() = SessionState::Ready(token.clone());
                Ok(token)
            }
            Err(err) => {
                *self.rejected_cookie.write() = self.session_cookie();
                Err(self.recover_challenge(err))
            }
        }
    }

    /// Fetch a challenge page, or report the pending challenge.
    ///
    /// With a URL, the page is fetched with the handshake headers and its body
    /// returned even when the status is a failure. Without one, the pending
    /// challenge payload is returned, or `None` if the session is not blocked.
    ///
    /// # Errors
    ///
    /// Transport failures that produced no response body.
    #[instrument(skip(self))]
    pub async fn get_challenge(&self, challenge_url: Option<&str>) -> Result<Option<Value>, ApiError> {
        let Some(url) = challenge_url else {
            return Ok(match self.state() {
                SessionState::ChallengePending(payload) => Some(payload.into_value()),
                _ => None,
            });
        };

        let descriptor =
            RequestDescriptor::get(url).headers(AUTH_REQUEST_HEADERS.iter().copied()).raw();
        let body = match self.executor.execute(descriptor).await {
            Ok(ExecutorResponse::Raw(raw)) => raw.body,
            Ok(ExecutorResponse::Json(value)) => return Ok(Some(value)),
            Err(ApiError::AuthOrTransport { body, .. }) if !body.is_empty() => body,
            Err(err) => return Err(err),
        };
        Ok(Some(serde_json::from_str(&body).unwrap_or(Value::String(body))))
    }

    /// Ensure a token and resolve the account identifiers via `/me`.
    ///
    /// A failing `/me` call leaves the identity unresolved; only token
    /// acquisition failures are returned.
    ///
    /// # Errors
    ///
    /// Any failure from [`ensure_token`](Self::ensure_token).
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<SessionIdentity, ApiError> {
        let token = self.ensure_token().await?;
        if self.identity.read().is_resolved() {
            return Ok(self.identity());
        }

        let descriptor = with_api_headers(RequestDescriptor::get(format!("{}/me", self.base_url)), &token);
        match self.executor.execute(descriptor).await.and_then(ExecutorResponse::into_json) {
            Ok(me) => {
                let identity = SessionIdentity {
                    profile_id: plain_id(&me),
                    public_id: me
                        .pointer("/miniProfile/publicIdentifier")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                };
                info!(resolved = identity.is_resolved(), "session identity loaded");
                *self.identity.write() = identity;
            }
            Err(err) => warn!(error = %err, "failed to resolve session identity"),
        }
        Ok(self.identity())
    }

    /// Header set for an authenticated call with the held token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::TokenMissing` when no token is held; callers must
    /// run [`ensure_token`](Self::ensure_token) first.
    pub fn authenticated_headers(&self) -> Result<HeaderList, ApiError> {
        let token = self.held_token().ok_or(ApiError::TokenMissing)?;
        Ok(with_api_headers(RequestDescriptor::get(&self.auth_url), &token).headers)
    }

    fn held_token(&self) -> Option<CsrfToken> {
        self.state.read().token().cloned()
    }

    fn session_cookie(&self) -> Option<String> {
        self.cookies.cookie(&self.auth_domain, SESSION_COOKIE_NAME)
    }

    fn token_from_cookie(&self) -> Option<CsrfToken> {
        if self.cookies.is_empty()
            || !self.cookies.has_unexpired_cookie(&self.auth_domain, SESSION_COOKIE_NAME)
        {
            return None;
        }
        let value = self.session_cookie()?;
        if self.rejected_cookie.read().as_deref() == Some(value.as_str()) {
            debug!("ignoring session cookie left by a failed handshake");
            return None;
        }
        Some(CsrfToken::from_cookie_value(&value)).filter(|token| !token.is_empty())
    }

    /// GET the auth endpoint for an initial cookie, then POST the credentials
    /// with that cookie's value.
    async fn handshake(&self, credentials: &Credentials) -> Result<CsrfToken, ApiError> {
        debug!(auth_url = %self.auth_url, "starting credential handshake");
        self.executor
            .execute(
                RequestDescriptor::get(&self.auth_url)
                    .headers(AUTH_REQUEST_HEADERS.iter().copied())
                    .raw(),
            )
            .await?;

        let initial = self
            .session_cookie()
            .map(|value| CsrfToken::from_cookie_value(&value).as_str().to_string())
            .unwrap_or_default();
        let form = vec![
            ("session_key".to_string(), credentials.username.clone()),
            ("session_password".to_string(), credentials.password.clone()),
            (SESSION_COOKIE_NAME.to_string(), initial),
        ];
        let response = self
            .executor
            .execute(
                RequestDescriptor::post(&self.auth_url)
                    .headers(AUTH_REQUEST_HEADERS.iter().copied())
                    .body(RequestBody::Form(form))
                    .raw(),
            )
            .await?;

        match self.session_cookie().map(|value| CsrfToken::from_cookie_value(&value)) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                let raw = response.into_raw();
                Err(ApiError::AuthOrTransport {
                    status: raw.as_ref().map_or(0, |raw| raw.status),
                    body: raw.map(|raw| raw.body).unwrap_or_default(),
                    message: "handshake completed without a session cookie".to_string(),
                })
            }
        }
    }

    /// Park a structured handshake failure as a pending challenge.
    fn recover_challenge(&self, err: ApiError) -> ApiError {
        let payload = match &err {
            ApiError::AuthOrTransport { body, .. } => ChallengePayload::from_body(body),
            _ => None,
        };
        match payload {
            Some(payload) => {
                warn!(
                    challenge_url = payload.challenge_url().unwrap_or_default(),
                    "handshake answered with a challenge"
                );
                *self.state.write() = SessionState::ChallengePending(payload.clone());
                ApiError::ChallengeRequired(payload)
            }
            None => {
                warn!(error = %err, "credential handshake failed");
                *self.state.write() = SessionState::NoToken;
                err
            }
        }
    }
}

#[async_trait]
impl AccessTokenProvider for SessionManager {
    async fn access_token(&self) -> Result<CsrfToken, ApiError> {
        self.ensure_token().await
    }
}

fn plain_id(me: &Value) -> Option<u64> {
    match me.get("plainId")? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}
