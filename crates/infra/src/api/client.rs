//! Client facade wiring pacing, transport, session and resources together.

use std::sync::Arc;

use serde_json::Value;
use voyager_common::resilience::{JitterPacer, RequestPacer};
use voyager_core::search::SearchVertical;
use voyager_core::{
    CompanyNormalizer, JsonResumeNormalizer, LinkedInCompanyNormalizer, ProfileNormalizer,
};
use voyager_domain::{ClientConfig, Credentials, QueryMap, SessionIdentity};

use super::errors::ApiError;
use super::executor::RequestExecutor;
use super::resources::{FailurePolicy, ResourceClient};
use super::session::SessionManager;
use crate::http::{HttpClient, SessionCookieJar};

/// One impersonated account: its own cookie jar, token state and pacer.
///
/// Instances never share cookies; build one client per account.
pub struct VoyagerClient {
    config: Arc<ClientConfig>,
    cookie_jar: Arc<SessionCookieJar>,
    session: Arc<SessionManager>,
    resources: ResourceClient,
}

impl VoyagerClient {
    pub fn builder() -> VoyagerClientBuilder {
        VoyagerClientBuilder::default()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn resources(&self) -> &ResourceClient {
        &self.resources
    }

    /// The cookie jar this client sends from and stores into.
    pub fn cookie_jar(&self) -> &Arc<SessionCookieJar> {
        &self.cookie_jar
    }

    /// Acquire a token and resolve the account identity.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::initialize`].
    pub async fn initialize(&self) -> Result<SessionIdentity, ApiError> {
        self.session.initialize().await
    }

    /// # Errors
    ///
    /// See [`ResourceClient::fetch_profile`].
    pub async fn fetch_profile(&self, profile_id: &str) -> Result<Value, ApiError> {
        self.resources.fetch_profile(profile_id, false).await
    }

    /// Primary view only, without the secondary resources.
    ///
    /// # Errors
    ///
    /// See [`ResourceClient::fetch_profile`].
    pub async fn fetch_profile_light(&self, profile_id: &str) -> Result<Value, ApiError> {
        self.resources.fetch_profile(profile_id, true).await
    }

    /// # Errors
    ///
    /// See [`ResourceClient::fetch_company`].
    pub async fn fetch_company(&self, universal_name: &str) -> Result<Value, ApiError> {
        self.resources.fetch_company(universal_name).await
    }

    /// # Errors
    ///
    /// See [`ResourceClient::fetch_group`].
    pub async fn fetch_group(&self, group_id: &str) -> Result<Value, ApiError> {
        self.resources.fetch_group(group_id).await
    }

    /// # Errors
    ///
    /// See [`ResourceClient::search`].
    pub async fn search(&self, vertical: SearchVertical, overrides: QueryMap) -> Result<Value, ApiError> {
        self.resources.search(vertical, overrides).await
    }

    /// # Errors
    ///
    /// See [`ResourceClient::profile_url_from_email`].
    pub async fn profile_url_from_email(&self, email: &str) -> Result<String, ApiError> {
        self.resources.profile_url_from_email(email).await
    }

    /// # Errors
    ///
    /// See [`ResourceClient::profile_handle_from_email`].
    pub async fn profile_handle_from_email(&self, email: &str) -> Result<String, ApiError> {
        self.resources.profile_handle_from_email(email).await
    }
}

/// Builder for [`VoyagerClient`]
#[derive(Default)]
pub struct VoyagerClientBuilder {
    config: Option<ClientConfig>,
    credentials: Option<Credentials>,
    cookie_jar: Option<Arc<SessionCookieJar>>,
    pacer: Option<Arc<dyn RequestPacer>>,
    profile_normalizer: Option<Arc<dyn ProfileNormalizer>>,
    company_normalizer: Option<Arc<dyn CompanyNormalizer>>,
    failure_policy: FailurePolicy,
}

impl VoyagerClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Credentials for the login handshake. Without them the client relies on
    /// a pre-seeded cookie jar.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Start from an existing jar, e.g. one seeded with a prior session.
    pub fn cookie_jar(mut self, jar: Arc<SessionCookieJar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Replace the jitter pacer derived from the configured window.
    pub fn pacer(mut self, pacer: Arc<dyn RequestPacer>) -> Self {
        self.pacer = Some(pacer);
        self
    }

    pub fn profile_normalizer(mut self, normalizer: Arc<dyn ProfileNormalizer>) -> Self {
        self.profile_normalizer = Some(normalizer);
        self
    }

    pub fn company_normalizer(mut self, normalizer: Arc<dyn CompanyNormalizer>) -> Self {
        self.company_normalizer = Some(normalizer);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` for an invalid configuration or when the
    /// transport cannot be created.
    pub fn build(self) -> Result<VoyagerClient, ApiError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let pacer: Arc<dyn RequestPacer> = match self.pacer {
            Some(pacer) => pacer,
            None => Arc::new(
                JitterPacer::from_millis(config.pacing.min_delay_ms, config.pacing.max_delay_ms)
                    .map_err(|e| ApiError::Config(e.to_string()))?,
            ),
        };
        let cookie_jar = self.cookie_jar.unwrap_or_else(|| Arc::new(SessionCookieJar::new()));

        let http = HttpClient::builder()
            .timeout(config.timeout())
            .cookie_jar(Arc::clone(&cookie_jar))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;
        let executor = Arc::new(RequestExecutor::new(http, pacer));

        let session = Arc::new(SessionManager::new(
            &config,
            Arc::clone(&executor),
            cookie_jar.clone(),
            self.credentials,
        )?);

        let config = Arc::new(config);
        let resources = ResourceClient::new(
            executor,
            session.clone(),
            Arc::clone(&config),
            self.profile_normalizer.unwrap_or_else(|| Arc::new(JsonResumeNormalizer)),
            self.company_normalizer.unwrap_or_else(|| Arc::new(LinkedInCompanyNormalizer)),
        )
        .with_policy(self.failure_policy);

        Ok(VoyagerClient { config, cookie_jar, session, resources })
    }
}
