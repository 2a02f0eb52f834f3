//! Session ports

/// Read-only view of the cookie store the Session Manager consults.
///
/// Implementations must be internally synchronized: the store is shared by
/// every request a client issues, including concurrent fan-out fetches.
pub trait CookieSource: Send + Sync {
    /// Value of cookie `name` for `domain`, if stored and unexpired.
    fn cookie(&self, domain: &str, name: &str) -> Option<String>;

    /// Whether an unexpired cookie `name` exists for `domain`.
    fn has_unexpired_cookie(&self, domain: &str, name: &str) -> bool {
        self.cookie(domain, name).is_some()
    }

    /// Whether the store holds no cookies at all.
    fn is_empty(&self) -> bool;
}
