//! Client configuration structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTH_URL, DEFAULT_BASE_URL, DEFAULT_EMAIL_LOOKUP_URL, DEFAULT_MAX_DELAY_MS,
    DEFAULT_MIN_DELAY_MS, DEFAULT_TIMEOUT_SECS, MAX_SEARCH_COUNT,
};
use crate::errors::{Result, VoyagerError};

/// Top-level client configuration.
///
/// Credentials are deliberately absent: they are passed to the client builder
/// and never read from configuration sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Versioned API prefix every resource path is appended to
    pub base_url: String,
    /// Login handshake endpoint
    pub auth_url: String,
    /// Email to profile redirect endpoint
    pub email_lookup_url: String,
    /// Inter-request pacing window
    pub pacing: PacingConfig,
    /// Transport timeout applied to every request
    pub timeout_secs: u64,
    /// Default page size for search calls
    pub max_search_count: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            email_lookup_url: DEFAULT_EMAIL_LOOKUP_URL.to_string(),
            pacing: PacingConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_search_count: MAX_SEARCH_COUNT,
        }
    }
}

impl ClientConfig {
    /// Transport timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Host of the authentication endpoint; session cookies are scoped to it.
    ///
    /// # Errors
    /// Returns `VoyagerError::Config` if `auth_url` is not an absolute URL.
    pub fn auth_domain(&self) -> Result<String> {
        let parsed = url::Url::parse(&self.auth_url)
            .map_err(|e| VoyagerError::Config(format!("Invalid auth_url: {e}")))?;
        parsed
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| VoyagerError::Config("auth_url has no host".to_string()))
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `VoyagerError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("base_url", &self.base_url),
            ("auth_url", &self.auth_url),
            ("email_lookup_url", &self.email_lookup_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| VoyagerError::Config(format!("Invalid {name} '{value}': {e}")))?;
        }
        self.pacing.validate()?;
        if self.timeout_secs == 0 {
            return Err(VoyagerError::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self.max_search_count == 0 {
            return Err(VoyagerError::Config(
                "max_search_count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Randomized delay window applied before every network call.
///
/// The delay is drawn uniformly from `[min_delay_ms, max_delay_ms)`. Equal
/// bounds produce a fixed delay (zero for tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { min_delay_ms: DEFAULT_MIN_DELAY_MS, max_delay_ms: DEFAULT_MAX_DELAY_MS }
    }
}

impl PacingConfig {
    /// A window that never sleeps.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { min_delay_ms: 0, max_delay_ms: 0 }
    }

    /// Validate the window bounds.
    ///
    /// # Errors
    /// Returns `VoyagerError::Config` if the lower bound exceeds the upper.
    pub fn validate(&self) -> Result<()> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(VoyagerError::Config(format!(
                "pacing min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        Ok(())
    }
}
