//! Protocol constants
//!
//! Centralized location for the endpoint URLs, header sets and backend limits
//! used by the Voyager client.

// Endpoints
pub const DEFAULT_BASE_URL: &str = "https://www.linkedin.com/voyager/api";
pub const DEFAULT_AUTH_URL: &str = "https://www.linkedin.com/uas/authenticate";
pub const DEFAULT_EMAIL_LOOKUP_URL: &str = "https://www.linkedin.com/sales/gmail/profile/proxy";

// Backend limits
/// Largest page size the search endpoints accept.
pub const MAX_SEARCH_COUNT: u32 = 49;

// Pacing window (milliseconds, half-open)
pub const DEFAULT_MIN_DELAY_MS: u64 = 2000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 6000;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Session cookie
pub const SESSION_COOKIE_NAME: &str = "JSESSIONID";

/// Marker of the HTML login wall served with a 200 in place of JSON.
pub const SIGN_IN_WALL_MARKER: &str = "<h1>Please sign in</h1>";

// Header names
pub const CSRF_TOKEN_HEADER: &str = "csrf-token";
pub const ACCEPT_HEADER: &str = "accept";

/// Accept header value for normalized search responses.
pub const NORMALIZED_JSON_ACCEPT: &str = "application/vnd.linkedin.normalized+json+2.1";

/// Desktop-browser header set sent with every API call.
pub const API_REQUEST_HEADERS: &[(&str, &str)] = &[
    (
        "user-agent",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/73.0.3683.103 Safari/537.36",
    ),
    ("accept-language", "en-us"),
    ("x-li-lang", "en_US"),
    ("x-restli-protocol-version", "2.0.0"),
];

/// Mobile-client header set used by the login handshake.
pub const AUTH_REQUEST_HEADERS: &[(&str, &str)] = &[
    ("X-Li-User-Agent", "LIAuthLibrary:3.2.4 com.linkedin.LinkedIn:8.8.1 iPhone:8.3"),
    ("User-Agent", "LinkedIn/8.8.1 CFNetwork/711.3.18 Darwin/14.0.0"),
    ("X-User-Language", "en"),
    ("X-User-Locale", "en_US"),
    ("Accept-Language", "en-us"),
];

// Decorations
pub const COMPANY_DECORATION_ID: &str =
    "com.linkedin.voyager.deco.organization.web.WebFullCompanyMain-12";
pub const JOB_SEARCH_DECORATION_ID: &str = "com.linkedin.voyager.deco.jserp.WebJobSearchHit-17";
