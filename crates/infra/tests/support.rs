//! Shared fixtures for the HTTP integration suites.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use tracing_subscriber::EnvFilter;
use voyager_common::testing::RecordingPacer;
use voyager_domain::constants::SESSION_COOKIE_NAME;
use voyager_domain::{ClientConfig, Credentials, PacingConfig};
use voyager_infra::api::VoyagerClient;
use voyager_infra::http::SessionCookieJar;
use wiremock::MockServer;

pub const API_PREFIX: &str = "/voyager/api";
pub const AUTH_PATH: &str = "/uas/authenticate";
pub const LOOKUP_PATH: &str = "/sales/gmail/profile/proxy";

static TRACING: Once = Once::new();

/// Route test logs through the libtest writer. `RUST_LOG` overrides `warn`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Client configuration pointing every endpoint at `server`, without pacing.
pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: format!("{}{API_PREFIX}", server.uri()),
        auth_url: format!("{}{AUTH_PATH}", server.uri()),
        email_lookup_url: format!("{}{LOOKUP_PATH}", server.uri()),
        pacing: PacingConfig::disabled(),
        timeout_secs: 5,
        ..ClientConfig::default()
    }
}

/// Path of an API resource under the mock server.
pub fn api_path(resource: &str) -> String {
    format!("{API_PREFIX}/{resource}")
}

pub fn server_host(server: &MockServer) -> String {
    reqwest::Url::parse(&server.uri())
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .expect("mock server URI has a host")
}

/// Jar holding a quoted `JSESSIONID` for the mock server's host.
pub fn seeded_jar(server: &MockServer, token: &str) -> Arc<SessionCookieJar> {
    let jar = Arc::new(SessionCookieJar::new());
    jar.insert(&server_host(server), SESSION_COOKIE_NAME, &format!("\"{token}\""));
    jar
}

pub fn credentials() -> Credentials {
    Credentials::new("me@example.com", "hunter2")
}

/// A client under test plus the pacer it dispatches through.
pub struct Harness {
    pub client: VoyagerClient,
    pub pacer: RecordingPacer,
}

pub struct HarnessBuilder<'a> {
    server: &'a MockServer,
    config: ClientConfig,
    jar: Option<Arc<SessionCookieJar>>,
    credentials: Option<Credentials>,
}

impl<'a> HarnessBuilder<'a> {
    pub fn new(server: &'a MockServer) -> Self {
        init_tracing();
        Self { server, config: config_for(server), jar: None, credentials: None }
    }

    pub fn with_config(mut self, edit: impl FnOnce(&mut ClientConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    pub fn with_session(mut self, token: &str) -> Self {
        self.jar = Some(seeded_jar(self.server, token));
        self
    }

    pub fn with_credentials(mut self) -> Self {
        self.credentials = Some(credentials());
        self
    }

    pub fn build(self) -> Harness {
        let pacer = RecordingPacer::new();
        let mut builder =
            VoyagerClient::builder().config(self.config).pacer(Arc::new(pacer.clone()));
        if let Some(jar) = self.jar {
            builder = builder.cookie_jar(jar);
        }
        if let Some(credentials) = self.credentials {
            builder = builder.credentials(credentials);
        }
        Harness { client: builder.build().expect("client should build"), pacer }
    }
}
