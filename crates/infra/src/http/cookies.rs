//! Per-client cookie store
//!
//! [`SessionCookieJar`] plugs into reqwest as the client's cookie provider, so
//! `Set-Cookie` responses land in it and matching cookies are attached to
//! every outgoing request. The session layer reads the same store through the
//! [`CookieSource`] port.
//!
//! Cookies are keyed by `(domain, path, name)`. A cookie set without a
//! `Domain` attribute is host-only; one with `Domain` also matches subdomains.

use std::collections::HashMap;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;
use tracing::trace;
use voyager_core::CookieSource;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CookieKey {
    domain: String,
    path: String,
    name: String,
}

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    host_only: bool,
    secure: bool,
    expires: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }
}

/// Thread-safe cookie store shared by one client's requests.
#[derive(Debug, Default)]
pub struct SessionCookieJar {
    cookies: RwLock<HashMap<CookieKey, StoredCookie>>,
}

impl SessionCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session cookie for `domain` (host-only, path `/`, no expiry).
    ///
    /// Used to resume a session established outside this client.
    pub fn insert(&self, domain: &str, name: &str, value: &str) {
        self.insert_with_expiry(domain, name, value, None);
    }

    /// Seed a cookie with an explicit expiry.
    pub fn insert_with_expiry(
        &self,
        domain: &str,
        name: &str,
        value: &str,
        expires: Option<DateTime<Utc>>,
    ) {
        let key = CookieKey {
            domain: domain.trim_start_matches('.').to_ascii_lowercase(),
            path: "/".to_string(),
            name: name.to_string(),
        };
        let cookie =
            StoredCookie { value: value.to_string(), host_only: true, secure: false, expires };
        self.cookies.write().insert(key, cookie);
    }

    /// Drop every cookie named `name` stored for `domain`.
    pub fn remove(&self, domain: &str, name: &str) {
        let domain = domain.trim_start_matches('.').to_ascii_lowercase();
        self.cookies.write().retain(|key, _| !(key.domain == domain && key.name == name));
    }

    /// Remove all cookies.
    pub fn clear(&self) {
        self.cookies.write().clear();
    }

    /// Number of stored cookies, expired ones included until overwritten.
    pub fn len(&self) -> usize {
        self.cookies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.read().is_empty()
    }

    /// Apply one `Set-Cookie` header received from `url`.
    ///
    /// Headers whose `Domain` does not cover the responding host are ignored.
    /// An already-expired cookie deletes any stored cookie with the same key.
    pub fn store_set_cookie(&self, header: &str, url: &Url) {
        let now = Utc::now();
        let Some((key, cookie)) = parse_set_cookie(header, url, now) else {
            trace!(url = %url, "ignoring unusable Set-Cookie header");
            return;
        };
        let mut cookies = self.cookies.write();
        if cookie.is_expired(now) {
            cookies.remove(&key);
        } else {
            trace!(domain = %key.domain, name = %key.name, "stored cookie");
            cookies.insert(key, cookie);
        }
    }

    /// `Cookie` header value for a request to `url`, if any cookie applies.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let host = url.host_str()?.to_ascii_lowercase();
        let path = url.path();
        let secure_channel = url.scheme() == "https";
        let now = Utc::now();

        let cookies = self.cookies.read();
        let mut matching: Vec<(&CookieKey, &StoredCookie)> = cookies
            .iter()
            .filter(|(key, cookie)| {
                !cookie.is_expired(now)
                    && (!cookie.secure || secure_channel)
                    && domain_matches(&host, &key.domain, cookie.host_only)
                    && path_matches(path, &key.path)
            })
            .collect();
        if matching.is_empty() {
            return None;
        }
        // Longer paths first, per RFC 6265 ordering.
        matching.sort_by(|(a, _), (b, _)| b.path.len().cmp(&a.path.len()).then(a.name.cmp(&b.name)));
        Some(
            matching
                .into_iter()
                .map(|(key, cookie)| format!("{}={}", key.name, cookie.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    fn lookup(&self, host: &str, name: &str) -> Option<String> {
        let host = host.trim_start_matches('.').to_ascii_lowercase();
        let now = Utc::now();
        self.cookies
            .read()
            .iter()
            .filter(|(key, cookie)| {
                key.name == name
                    && !cookie.is_expired(now)
                    && domain_matches(&host, &key.domain, cookie.host_only)
            })
            .max_by_key(|(key, _)| key.path.len())
            .map(|(_, cookie)| cookie.value.clone())
    }
}

impl CookieStore for SessionCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for header in cookie_headers {
            if let Ok(raw) = header.to_str() {
                self.store_set_cookie(raw, url);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.header_for(url).and_then(|header| HeaderValue::from_str(&header).ok())
    }
}

impl CookieSource for SessionCookieJar {
    fn cookie(&self, domain: &str, name: &str) -> Option<String> {
        self.lookup(domain, name)
    }

    fn is_empty(&self) -> bool {
        SessionCookieJar::is_empty(self)
    }
}

fn parse_set_cookie(
    header: &str,
    url: &Url,
    now: DateTime<Utc>,
) -> Option<(CookieKey, StoredCookie)> {
    let host = url.host_str()?.to_ascii_lowercase();
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut domain = None;
    let mut path = None;
    let mut expires = None;
    let mut max_age = None;
    let mut secure = false;

    for attribute in parts {
        let (attr, attr_value) = match attribute.split_once('=') {
            Some((attr, attr_value)) => (attr.trim(), attr_value.trim()),
            None => (attribute.trim(), ""),
        };
        match attr.to_ascii_lowercase().as_str() {
            "domain" if !attr_value.is_empty() => {
                domain = Some(attr_value.trim_start_matches('.').to_ascii_lowercase());
            }
            "path" if attr_value.starts_with('/') => path = Some(attr_value.to_string()),
            "expires" => expires = parse_expires(attr_value),
            "max-age" => max_age = attr_value.parse::<i64>().ok(),
            "secure" => secure = true,
            _ => {}
        }
    }

    let host_only = domain.is_none();
    let domain = match domain {
        Some(domain) if domain_matches(&host, &domain, false) => domain,
        Some(_) => return None,
        None => host,
    };

    let expires = match max_age {
        Some(seconds) if seconds <= 0 => Some(DateTime::<Utc>::MIN_UTC),
        Some(seconds) => Some(
            ChronoDuration::try_seconds(seconds)
                .and_then(|delta| now.checked_add_signed(delta))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        ),
        None => expires,
    };

    let key = CookieKey {
        domain,
        path: path.unwrap_or_else(|| default_path(url.path())),
        name: name.to_string(),
    };
    Some((key, StoredCookie { value: value.trim().to_string(), host_only, secure, expires }))
}

/// Parse an `Expires` date in RFC 1123 form or the older dashed form
/// (`Thu, 01-Jan-2026 00:00:00 GMT`).
fn parse_expires(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.replace('-', " ");
    DateTime::parse_from_rfc2822(&normalized)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn domain_matches(host: &str, domain: &str, host_only: bool) -> bool {
    if host == domain {
        return true;
    }
    !host_only
        && host.len() > domain.len()
        && host.ends_with(domain)
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    request_path == cookie_path
        || (request_path.starts_with(cookie_path)
            && (cookie_path.ends_with('/')
                || request_path.as_bytes().get(cookie_path.len()) == Some(&b'/')))
}

fn default_path(request_path: &str) -> String {
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(index) => request_path[..index].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn stores_and_serves_host_cookie() {
        let jar = SessionCookieJar::new();
        jar.store_set_cookie("JSESSIONID=\"ajax:123\"; Path=/", &url("https://www.linkedin.com/uas/authenticate"));

        assert_eq!(jar.cookie("www.linkedin.com", "JSESSIONID").as_deref(), Some("\"ajax:123\""));
        assert!(jar.has_unexpired_cookie("www.linkedin.com", "JSESSIONID"));
        assert_eq!(jar.cookie("linkedin.com", "JSESSIONID"), None);
        assert_eq!(
            jar.header_for(&url("https://www.linkedin.com/voyager/api/me")).as_deref(),
            Some("JSESSIONID=\"ajax:123\"")
        );
    }

    #[test]
    fn domain_cookie_matches_subdomains() {
        let jar = SessionCookieJar::new();
        jar.store_set_cookie("li_at=abc; Domain=.linkedin.com; Path=/", &url("https://www.linkedin.com/"));

        assert_eq!(jar.cookie("www.linkedin.com", "li_at").as_deref(), Some("abc"));
        assert!(jar.header_for(&url("https://api.linkedin.com/x")).is_some());
        assert!(jar.header_for(&url("https://evil-linkedin.com/x")).is_none());
    }

    #[test]
    fn rejects_foreign_domain_attribute() {
        let jar = SessionCookieJar::new();
        jar.store_set_cookie("a=b; Domain=example.com", &url("https://www.linkedin.com/"));
        assert!(jar.is_empty());
    }

    #[test]
    fn expired_cookies_are_invisible_and_delete() {
        let jar = SessionCookieJar::new();
        let site = url("https://www.linkedin.com/");
        jar.store_set_cookie("JSESSIONID=old; Path=/", &site);
        jar.store_set_cookie("JSESSIONID=gone; Path=/; Expires=Thu, 01-Jan-1970 00:00:01 GMT", &site);

        assert!(!jar.has_unexpired_cookie("www.linkedin.com", "JSESSIONID"));
        assert!(jar.is_empty());
    }

    #[test]
    fn max_age_takes_precedence_over_expires() {
        let jar = SessionCookieJar::new();
        jar.store_set_cookie(
            "token=x; Max-Age=3600; Expires=Thu, 01 Jan 1970 00:00:01 GMT",
            &url("https://www.linkedin.com/"),
        );
        assert_eq!(jar.cookie("www.linkedin.com", "token").as_deref(), Some("x"));

        jar.store_set_cookie("token=x; Max-Age=0", &url("https://www.linkedin.com/"));
        assert_eq!(jar.cookie("www.linkedin.com", "token"), None);
    }

    #[test]
    fn oversized_max_age_saturates() {
        let jar = SessionCookieJar::new();
        jar.store_set_cookie("a=b; Max-Age=99999999999999", &url("https://www.linkedin.com/"));
        jar.store_set_cookie(
            &format!("c=d; Max-Age={}", i64::MAX),
            &url("https://www.linkedin.com/"),
        );

        assert_eq!(jar.cookie("www.linkedin.com", "a").as_deref(), Some("b"));
        assert_eq!(jar.cookie("www.linkedin.com", "c").as_deref(), Some("d"));
        assert!(jar.has_unexpired_cookie("www.linkedin.com", "a"));
    }

    #[test]
    fn secure_cookies_stay_off_plain_http() {
        let jar = SessionCookieJar::new();
        jar.store_set_cookie("s=1; Secure", &url("https://www.linkedin.com/"));
        assert!(jar.header_for(&url("http://www.linkedin.com/")).is_none());
        assert!(jar.header_for(&url("https://www.linkedin.com/")).is_some());
    }

    #[test]
    fn path_scoping_follows_default_path() {
        let jar = SessionCookieJar::new();
        jar.store_set_cookie("p=1", &url("https://h.example/app/login"));
        assert!(jar.header_for(&url("https://h.example/app/next")).is_some());
        assert!(jar.header_for(&url("https://h.example/application")).is_none());
        assert!(jar.header_for(&url("https://h.example/other")).is_none());
    }

    #[test]
    fn seeded_cookie_is_visible_through_port() {
        let jar = SessionCookieJar::new();
        jar.insert("www.linkedin.com", "JSESSIONID", "\"ajax:seed\"");

        let source: &dyn CookieSource = &jar;
        assert!(!source.is_empty());
        assert_eq!(source.cookie("www.linkedin.com", "JSESSIONID").as_deref(), Some("\"ajax:seed\""));

        jar.insert_with_expiry(
            "www.linkedin.com",
            "JSESSIONID",
            "stale",
            Some(Utc::now() - ChronoDuration::seconds(5)),
        );
        assert!(!source.has_unexpired_cookie("www.linkedin.com", "JSESSIONID"));
    }

    #[test]
    fn parses_both_expires_forms() {
        assert!(parse_expires("Wed, 21 Oct 2037 07:28:00 GMT").is_some());
        assert!(parse_expires("Wed, 21-Oct-2037 07:28:00 GMT").is_some());
        assert!(parse_expires("not a date").is_none());
    }
}
