//! Resource Client
//!
//! Builds endpoint-specific descriptors and runs them with the session token.
//!
//! The protocol layers below are strict; this layer is deliberately lenient.
//! Under [`FailurePolicy::Degrade`] (the default) a failed company, group or
//! search call resolves to an empty result and a failed secondary profile
//! resource contributes nothing to the merged profile. The primary profile
//! view always propagates its failure.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use voyager_core::profile::{merge_profile_parts, unwrap_resource_payload, ProfileResource};
use voyager_core::search::{plan_search, SearchVertical};
use voyager_core::{CompanyNormalizer, ProfileNormalizer};
use voyager_domain::constants::{
    ACCEPT_HEADER, AUTH_REQUEST_HEADERS, COMPANY_DECORATION_ID, NORMALIZED_JSON_ACCEPT,
};
use voyager_domain::utils::{extract_handle_from_profile_url, parse_profile_url_from_redirect};
use voyager_domain::{ClientConfig, QueryMap, QueryValue, RequestDescriptor};

use super::errors::ApiError;
use super::executor::RequestExecutor;
use super::session::{with_api_headers, AccessTokenProvider};

/// What a lenient operation does with a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log and resolve to an empty result
    #[default]
    Degrade,
    /// Return the classified error
    Propagate,
}

/// Endpoint-level operations over an authenticated session.
#[derive(Clone)]
pub struct ResourceClient {
    executor: Arc<RequestExecutor>,
    tokens: Arc<dyn AccessTokenProvider>,
    config: Arc<ClientConfig>,
    profile_normalizer: Arc<dyn ProfileNormalizer>,
    company_normalizer: Arc<dyn CompanyNormalizer>,
    policy: FailurePolicy,
}

impl ResourceClient {
    pub fn new(
        executor: Arc<RequestExecutor>,
        tokens: Arc<dyn AccessTokenProvider>,
        config: Arc<ClientConfig>,
        profile_normalizer: Arc<dyn ProfileNormalizer>,
        company_normalizer: Arc<dyn CompanyNormalizer>,
    ) -> Self {
        Self {
            executor,
            tokens,
            config,
            profile_normalizer,
            company_normalizer,
            policy: FailurePolicy::default(),
        }
    }

    /// A copy of this client using `policy` for lenient operations.
    #[must_use]
    pub fn with_policy(&self, policy: FailurePolicy) -> Self {
        Self { policy, ..self.clone() }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Fetch and normalize a profile.
    ///
    /// A full fetch issues the primary view and the four secondary resources
    /// concurrently and merges them in resource order.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty identifier
    /// - token acquisition failures
    /// - the primary view's failure
    /// - a secondary failure under [`FailurePolicy::Propagate`]
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self, profile_id: &str, light: bool) -> Result<Value, ApiError> {
        let profile_id = profile_id.trim();
        if profile_id.is_empty() {
            return Err(ApiError::InvalidArgument("a profile identifier is required".into()));
        }
        self.tokens.access_token().await?;

        let resources = ProfileResource::for_depth(light);
        let responses = join_all(
            resources.iter().map(|resource| self.fetch_profile_resource(profile_id, *resource)),
        )
        .await;

        let mut parts = Vec::with_capacity(responses.len());
        for (resource, response) in resources.iter().zip(responses) {
            match response {
                Ok(payload) => parts.push(unwrap_resource_payload(payload)),
                Err(err) if resource.is_primary() || self.policy == FailurePolicy::Propagate => {
                    return Err(err);
                }
                Err(err) => {
                    warn!(%resource, error = %err, "profile resource unavailable, continuing without it");
                }
            }
        }

        let merged = merge_profile_parts(profile_id, parts);
        Ok(self.profile_normalizer.normalize_profile(&merged))
    }

    /// Fetch a company by universal name; a list of normalized elements.
    ///
    /// # Errors
    ///
    /// Only under [`FailurePolicy::Propagate`].
    #[instrument(skip(self))]
    pub async fn fetch_company(&self, universal_name: &str) -> Result<Value, ApiError> {
        let result = self.company_elements(universal_name).await;
        self.settle("fetch_company", result, json!({}))
    }

    /// Fetch a group by numeric id.
    ///
    /// # Errors
    ///
    /// Only under [`FailurePolicy::Propagate`].
    #[instrument(skip(self))]
    pub async fn fetch_group(&self, group_id: &str) -> Result<Value, ApiError> {
        let uri = self.endpoint(&format!("groups/groups/urn%3Ali%3Agroup%3A{group_id}"));
        let result = self.authorized_json(RequestDescriptor::get(uri)).await;
        self.settle("fetch_group", result, json!({}))
    }

    /// Run a search of the given vertical with caller overrides.
    ///
    /// # Errors
    ///
    /// Only under [`FailurePolicy::Propagate`].
    #[instrument(skip(self, overrides), fields(vertical = %vertical))]
    pub async fn search(&self, vertical: SearchVertical, overrides: QueryMap) -> Result<Value, ApiError> {
        let plan = plan_search(vertical, overrides, self.config.max_search_count);
        let descriptor = RequestDescriptor::get(self.endpoint(plan.endpoint.path()))
            .header(ACCEPT_HEADER, NORMALIZED_JSON_ACCEPT)
            .query(plan.query);
        let result = self.authorized_json(descriptor).await;
        self.settle("search", result, json!([]))
    }

    /// Blended search across all verticals.
    pub async fn search_all(&self, overrides: QueryMap) -> Result<Value, ApiError> {
        self.search(SearchVertical::All, overrides).await
    }

    pub async fn search_profiles(&self, overrides: QueryMap) -> Result<Value, ApiError> {
        self.search(SearchVertical::People, overrides).await
    }

    pub async fn search_companies(&self, overrides: QueryMap) -> Result<Value, ApiError> {
        self.search(SearchVertical::Companies, overrides).await
    }

    /// Faceted blended company search.
    pub async fn search_companies_extended(&self, overrides: QueryMap) -> Result<Value, ApiError> {
        self.search(SearchVertical::CompaniesExtended, overrides).await
    }

    pub async fn search_groups(&self, overrides: QueryMap) -> Result<Value, ApiError> {
        self.search(SearchVertical::Groups, overrides).await
    }

    pub async fn search_schools(&self, overrides: QueryMap) -> Result<Value, ApiError> {
        self.search(SearchVertical::Schools, overrides).await
    }

    pub async fn search_contents(&self, overrides: QueryMap) -> Result<Value, ApiError> {
        self.search(SearchVertical::Contents, overrides).await
    }

    pub async fn search_jobs(&self, overrides: QueryMap) -> Result<Value, ApiError> {
        self.search(SearchVertical::Jobs, overrides).await
    }

    /// Canonical profile URL for an email address.
    ///
    /// Follows the lookup endpoint's redirects and parses the final URL.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty email
    /// - `NotFound` when the final URL is not a profile URL
    /// - the lookup request's classified failure
    #[instrument(skip(self, email))]
    pub async fn profile_url_from_email(&self, email: &str) -> Result<String, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::InvalidArgument("an email address is required".into()));
        }
        let uri = format!(
            "{}/{}",
            self.config.email_lookup_url.trim_end_matches('/'),
            urlencoding::encode(email)
        );
        let descriptor =
            RequestDescriptor::get(uri).headers(AUTH_REQUEST_HEADERS.iter().copied()).raw();
        let final_url = self
            .executor
            .execute(descriptor)
            .await?
            .into_raw()
            .map(|raw| raw.url)
            .ok_or_else(|| ApiError::NotFound("email lookup returned no response URL".into()))?;
        debug!(final_url = %final_url, "email lookup resolved");
        parse_profile_url_from_redirect(&final_url)
            .ok_or_else(|| ApiError::NotFound(format!("no profile redirect for lookup: {final_url}")))
    }

    /// Public handle for an email address.
    ///
    /// # Errors
    ///
    /// As [`profile_url_from_email`](Self::profile_url_from_email), plus
    /// `NotFound` when the profile URL carries no handle.
    pub async fn profile_handle_from_email(&self, email: &str) -> Result<String, ApiError> {
        let profile_url = self.profile_url_from_email(email).await?;
        extract_handle_from_profile_url(&profile_url)
            .ok_or_else(|| ApiError::NotFound(format!("no handle in profile URL {profile_url}")))
    }

    async fn fetch_profile_resource(
        &self,
        profile_id: &str,
        resource: ProfileResource,
    ) -> Result<Value, ApiError> {
        let uri = resource.uri(&self.config.base_url, profile_id, self.config.max_search_count);
        self.authorized_json(RequestDescriptor::get(uri)).await
    }

    async fn company_elements(&self, universal_name: &str) -> Result<Value, ApiError> {
        let descriptor = RequestDescriptor::get(self.endpoint("organization/companies"))
            .query_param("decorationId", QueryValue::scalar(COMPANY_DECORATION_ID))
            .query_param("q", QueryValue::scalar("universalName"))
            .query_param("universalName", QueryValue::scalar(universal_name));
        let response = self.authorized_json(descriptor).await?;
        let companies = match response.get("elements").and_then(Value::as_array) {
            Some(elements) => elements
                .iter()
                .map(|element| self.company_normalizer.normalize_company(element))
                .collect::<Vec<_>>(),
            None => Vec::new(),
        };
        Ok(Value::Array(companies))
    }

    async fn authorized_json(&self, descriptor: RequestDescriptor) -> Result<Value, ApiError> {
        let token = self.tokens.access_token().await?;
        self.executor.execute(with_api_headers(descriptor, &token)).await?.into_json()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn settle(&self, operation: &str, result: Result<Value, ApiError>, empty: Value) -> Result<Value, ApiError> {
        match (result, self.policy) {
            (Ok(value), _) => Ok(value),
            (Err(err), FailurePolicy::Propagate) => Err(err),
            (Err(err), FailurePolicy::Degrade) => {
                warn!(operation, error = %err, "resource call failed, returning empty result");
                Ok(empty)
            }
        }
    }
}
