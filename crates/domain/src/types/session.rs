//! Session and authentication state

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anti-forgery token sent as `csrf-token` on authenticated calls.
///
/// Sourced from the `JSESSIONID` cookie with surrounding quotes removed.
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Derive a token from a raw `JSESSIONID` cookie value.
    ///
    /// ```
    /// use voyager_domain::CsrfToken;
    ///
    /// let token = CsrfToken::from_cookie_value("\"ajax:5529\"");
    /// assert_eq!(token.as_str(), "ajax:5529");
    /// ```
    #[must_use]
    pub fn from_cookie_value(raw: &str) -> Self {
        Self(raw.trim().trim_matches('"').to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CsrfToken(<{} chars>)", self.0.len())
    }
}

/// Structured challenge (CAPTCHA, 2FA prompt) returned by a failed handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengePayload(Value);

impl ChallengePayload {
    /// Wrap a response body if it has the structured shape of a challenge.
    ///
    /// Only JSON objects qualify; plain strings, arrays and scalars are plain
    /// errors, not challenges.
    #[must_use]
    pub fn from_body(body: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) => Some(Self(value)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Challenge page URL, when the server supplied one.
    #[must_use]
    pub fn challenge_url(&self) -> Option<&str> {
        self.0.get("challenge_url").and_then(Value::as_str)
    }
}

/// Token lifecycle: `NoToken -> Acquiring -> Ready`, with invalidation returning
/// to `NoToken` and a blocked handshake parking in `ChallengePending`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    NoToken,
    Acquiring,
    Ready(CsrfToken),
    ChallengePending(ChallengePayload),
}

impl SessionState {
    /// The usable token, if any. A pending challenge is never a token.
    #[must_use]
    pub fn token(&self) -> Option<&CsrfToken> {
        match self {
            Self::Ready(token) => Some(token),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoToken => "no_token",
            Self::Acquiring => "acquiring",
            Self::Ready(_) => "ready",
            Self::ChallengePending(_) => "challenge_pending",
        }
    }
}

/// Login credentials. `Debug` redacts the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Lazily resolved account identity of the authenticated session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Numeric member identifier (`plainId`)
    pub profile_id: Option<u64>,
    /// Human-readable handle (`miniProfile.publicIdentifier`)
    pub public_id: Option<String>,
}

impl SessionIdentity {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.profile_id.is_some() && self.public_id.is_some()
    }
}
