//! Request Executor
//!
//! Turns a [`RequestDescriptor`] into one paced HTTP call and classifies the
//! outcome. The executor never retries and never touches session state; it
//! only reports what happened.
//!
//! Success requires all of:
//! - a `2xx` or `3xx` status
//! - a non-empty body
//! - no sign-in wall marker in the body (the backend serves its HTML login
//!   page with a `200` once a session is no longer valid)

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use voyager_common::resilience::RequestPacer;
use voyager_core::query::append_query;
use voyager_domain::constants::SIGN_IN_WALL_MARKER;
use voyager_domain::{HeaderList, HttpMethod, RequestBody, RequestDescriptor};

use super::errors::ApiError;
use crate::http::HttpClient;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Transport response handed back when the descriptor asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Final URL after redirects
    pub url: String,
    pub headers: HeaderList,
    pub body: String,
}

/// Successful execution outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutorResponse {
    Json(Value),
    Raw(RawResponse),
}

impl ExecutorResponse {
    /// Decoded body; a raw response is parsed on demand.
    pub fn into_json(self) -> Result<Value, ApiError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Raw(raw) => decode_body(&raw.body),
        }
    }

    pub fn into_raw(self) -> Option<RawResponse> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Json(_) => None,
        }
    }
}

/// Paced, classified dispatch of request descriptors.
pub struct RequestExecutor {
    http: HttpClient,
    pacer: Arc<dyn RequestPacer>,
}

impl RequestExecutor {
    pub fn new(http: HttpClient, pacer: Arc<dyn RequestPacer>) -> Self {
        Self { http, pacer }
    }

    /// Execute one request.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` for a descriptor with an empty or relative URI
    /// - `AuthOrTransport` for a rejected status, empty body or sign-in wall
    /// - `Decode` when a successful body is not JSON
    /// - `Network`/`Timeout` for transport failures
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, uri = %descriptor.uri))]
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<ExecutorResponse, ApiError> {
        descriptor.validate().map_err(|err| ApiError::InvalidRequest(err.to_string()))?;

        let RequestDescriptor { method, uri, headers, query, body, raw } = descriptor;
        let url = match query {
            Some(query) => append_query(&uri, &query),
            None => uri,
        };

        let mut builder = self.http.request(to_reqwest_method(method), &url);
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }
        builder = match body {
            Some(RequestBody::Raw(text)) => builder.body(text),
            Some(RequestBody::Structured(value)) => {
                let text = serde_json::to_string(&value)
                    .map_err(|err| ApiError::InvalidRequest(format!("unserializable body: {err}")))?;
                let builder = if headers.get(CONTENT_TYPE.as_str()).is_none() {
                    builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                } else {
                    builder
                };
                builder.body(text)
            }
            Some(RequestBody::Form(fields)) => builder.form(&fields),
            None => builder,
        };

        self.pacer.delay().await;

        let response = self.http.send(builder).await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let response_headers: HeaderList = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|value| (name.as_str(), value)))
            .collect();
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Network(format!("failed to read response body: {err}")))?;

        if let Err(err) = classify(status, &text) {
            warn!(status, url = %final_url, error = %err, "request rejected");
            return Err(err);
        }
        debug!(status, url = %final_url, bytes = text.len(), "request succeeded");

        if raw {
            return Ok(ExecutorResponse::Raw(RawResponse {
                status,
                url: final_url,
                headers: response_headers,
                body: text,
            }));
        }
        decode_body(&text).map(ExecutorResponse::Json)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
    }
}

/// Apply the success rule to a completed response.
pub(crate) fn classify(status: u16, body: &str) -> Result<(), ApiError> {
    let message = if !(200..400).contains(&status) {
        format!("unexpected HTTP status {status}")
    } else if body.is_empty() {
        "empty response body".to_string()
    } else if body.contains(SIGN_IN_WALL_MARKER) {
        "sign-in wall returned in place of data".to_string()
    } else {
        return Ok(());
    };
    Err(ApiError::AuthOrTransport { status, body: body.to_string(), message })
}

fn decode_body(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))
}
