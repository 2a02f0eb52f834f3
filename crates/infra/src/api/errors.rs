//! API-specific error types
//!
//! Classifies protocol-layer failures so callers can drive re-authentication
//! and retry policy; nothing in this crate retries on its own.

use thiserror::Error;
use voyager_domain::{ChallengePayload, VoyagerError};

/// Categories of API errors for caller-side recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Malformed caller input - fatal to the call
    Client,
    /// Rejected status, empty body or sign-in wall - re-authenticate and retry
    Authentication,
    /// Interactive verification required before a token can be issued
    Challenge,
    /// Success status with an undecodable body - transient
    Decode,
    /// Connection failures and timeouts - retryable
    Network,
    /// Missing credentials, missing token or bad configuration - fatal
    Config,
    /// Lookup produced no result
    NotFound,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Credentials required: no session token, session cookie or credentials available")]
    CredentialsRequired,

    #[error("Authenticated request attempted without a session token")]
    TokenMissing,

    #[error("Request failed with status {status}: {message}")]
    AuthOrTransport { status: u16, body: String, message: String },

    #[error("Failed to decode response body: {0}")]
    Decode(String),

    #[error("Challenge required before authentication can complete")]
    ChallengeRequired(ChallengePayload),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::InvalidRequest(_) | Self::InvalidArgument(_) => ApiErrorCategory::Client,
            Self::AuthOrTransport { .. } => ApiErrorCategory::Authentication,
            Self::ChallengeRequired(_) => ApiErrorCategory::Challenge,
            Self::Decode(_) => ApiErrorCategory::Decode,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::CredentialsRequired | Self::TokenMissing | Self::Config(_) => {
                ApiErrorCategory::Config
            }
            Self::NotFound(_) => ApiErrorCategory::NotFound,
        }
    }

    /// Whether the caller should drop the session and authenticate again
    pub fn should_reauthenticate(&self) -> bool {
        self.category() == ApiErrorCategory::Authentication
    }

    /// Whether repeating the same call may succeed
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::Authentication | ApiErrorCategory::Decode | ApiErrorCategory::Network
        )
    }

    /// HTTP status and raw body of a rejected response
    pub fn response(&self) -> Option<(u16, &str)> {
        match self {
            Self::AuthOrTransport { status, body, .. } => Some((*status, body.as_str())),
            _ => None,
        }
    }

    /// Challenge payload of a blocked handshake
    pub fn challenge(&self) -> Option<&ChallengePayload> {
        match self {
            Self::ChallengeRequired(payload) => Some(payload),
            _ => None,
        }
    }
}

impl From<VoyagerError> for ApiError {
    fn from(err: VoyagerError) -> Self {
        match err {
            VoyagerError::Config(msg) => Self::Config(msg),
            VoyagerError::Network(msg) | VoyagerError::Internal(msg) => Self::Network(msg),
            VoyagerError::Timeout(msg) => Self::Timeout(msg),
            VoyagerError::InvalidInput(msg) => Self::InvalidRequest(msg),
            VoyagerError::NotFound(msg) => Self::NotFound(msg),
        }
    }
}
