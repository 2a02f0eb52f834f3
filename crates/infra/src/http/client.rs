use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use voyager_domain::constants::DEFAULT_TIMEOUT_SECS;
use voyager_domain::VoyagerError;

use super::cookies::SessionCookieJar;
use crate::errors::InfraError;

/// HTTP client with a transport timeout and an optional per-client cookie jar.
///
/// Each `send` is a single attempt; retry policy belongs to callers.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, VoyagerError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, VoyagerError> {
        let request = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            VoyagerError::from(infra)
        })?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                let infra: InfraError = err.into();
                Err(VoyagerError::from(infra))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    cookie_jar: Option<Arc<SessionCookieJar>>,
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Route `Cookie`/`Set-Cookie` traffic through `jar`.
    pub fn cookie_jar(mut self, jar: Arc<SessionCookieJar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    pub fn build(self) -> Result<HttpClient, VoyagerError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let mut builder = ReqwestClient::builder().timeout(timeout).no_proxy();

        if let Some(jar) = self.cookie_jar {
            builder = builder.cookie_provider(jar);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            VoyagerError::from(infra)
        })?;

        Ok(HttpClient { client })
    }
}
