//! Request descriptor value objects
//!
//! A [`RequestDescriptor`] is the logical description of one call. Query values
//! and bodies are explicit tagged variants, decided once when the descriptor is
//! built instead of being probed for shape at dispatch time.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, VoyagerError};

const LIST_PREFIX: &str = "List(";

/// HTTP verbs used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A single query-parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QueryValue {
    /// Plain value, form-encoded with commas preserved
    Scalar(String),
    /// Rendered as `List(a,b,c)` with the strict encoding
    List(Vec<String>),
}

impl QueryValue {
    /// Build a scalar value.
    pub fn scalar(value: impl ToString) -> Self {
        Self::Scalar(value.to_string())
    }

    /// Build a list value from any sequence of strings.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Classify a raw string: a pre-rendered `List(...)` literal becomes a
    /// [`QueryValue::List`], anything else a scalar.
    ///
    /// ```
    /// use voyager_domain::QueryValue;
    ///
    /// assert_eq!(QueryValue::from_literal("List()"), QueryValue::List(vec![]));
    /// assert_eq!(
    ///     QueryValue::from_literal("List(v->PEOPLE,v->GROUPS)"),
    ///     QueryValue::list(["v->PEOPLE", "v->GROUPS"])
    /// );
    /// assert_eq!(QueryValue::from_literal("guided"), QueryValue::scalar("guided"));
    /// ```
    #[must_use]
    pub fn from_literal(raw: &str) -> Self {
        match raw.strip_prefix(LIST_PREFIX).and_then(|rest| rest.strip_suffix(')')) {
            Some("") => Self::List(Vec::new()),
            Some(inner) => Self::List(inner.split(',').map(str::to_string).collect()),
            None => Self::Scalar(raw.to_string()),
        }
    }

    /// Whether this value uses the list encoding.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Unencoded wire form (`List(a,b)` for lists).
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::List(items) => format!("{LIST_PREFIX}{})", items.join(",")),
        }
    }

    /// Items of a list value, or the scalar as a one-element list.
    #[must_use]
    pub fn into_items(self) -> Vec<String> {
        match self {
            Self::Scalar(value) => vec![value],
            Self::List(items) => items,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::from_literal(value)
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::from_literal(&value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::scalar(value)
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::scalar(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(items: Vec<&str>) -> Self {
        Self::list(items)
    }
}

/// Query parameters keyed by name.
pub type QueryMap = BTreeMap<String, QueryValue>;

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent verbatim
    Raw(String),
    /// Serialized to its canonical JSON string before dispatch
    Structured(Value),
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
}

/// Header mapping with case-insensitive unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList(Vec<(String, String)>);

impl HeaderList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any existing entry with the same name
    /// regardless of case.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(&name)) {
            Some(entry) => *entry = (name, value),
            None => self.0.push((name, value)),
        }
    }

    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderList
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// One logical call: method, absolute URI, headers, optional query and body,
/// and whether the caller wants the raw transport response.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub uri: String,
    pub headers: HeaderList,
    pub query: Option<QueryMap>,
    pub body: Option<RequestBody>,
    pub raw: bool,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(method: HttpMethod, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: HeaderList::new(),
            query: None,
            body: None,
            raw: false,
        }
    }

    #[must_use]
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, uri)
    }

    #[must_use]
    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, uri)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Merge a header set; later entries override earlier ones.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.insert(name, value);
        }
        self
    }

    #[must_use]
    pub fn query(mut self, query: QueryMap) -> Self {
        self.query = Some(query);
        self
    }

    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.get_or_insert_with(QueryMap::new).insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Ask for the raw transport response instead of a decoded body.
    #[must_use]
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Reject descriptors that cannot be dispatched.
    ///
    /// # Errors
    /// Returns `VoyagerError::InvalidInput` for an empty or non-absolute URI.
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(VoyagerError::InvalidInput("request URI is empty".to_string()));
        }
        url::Url::parse(&self.uri).map_err(|e| {
            VoyagerError::InvalidInput(format!("request URI '{}' is not absolute: {e}", self.uri))
        })?;
        Ok(())
    }
}
