//! LinkedIn URL and URN helpers
//!
//! Pure string functions used when resolving profiles from redirects and when
//! reshaping API payloads.

use url::Url;

const CANONICAL_PROFILE_PREFIX: &str = "https://linkedin.com/in/";

/// Characters dropped from a `/people/` redirect tail.
const PEOPLE_TAIL_STRIPPED: &str = "`~!@#$%^&*()|+-=?;:'\",.<>{}[]\\/";

/// Turn the final URL of an email-lookup redirect into a canonical profile URL.
///
/// `/people/<tail>` redirects are rewritten to `https://linkedin.com/in/<tail>`
/// with punctuation removed from the tail; `/in/` URLs are already canonical.
/// Anything else is not a profile.
///
/// ```
/// use voyager_domain::utils::parse_profile_url_from_redirect;
///
/// assert_eq!(
///     parse_profile_url_from_redirect("https://www.linkedin.com/people/jane.doe"),
///     Some("https://linkedin.com/in/janedoe".to_string())
/// );
/// assert_eq!(parse_profile_url_from_redirect("https://www.linkedin.com/feed/"), None);
/// ```
#[must_use]
pub fn parse_profile_url_from_redirect(href: &str) -> Option<String> {
    if let Some((_, tail)) = href.split_once("/people/") {
        let cleaned: String = tail.chars().filter(|c| !PEOPLE_TAIL_STRIPPED.contains(*c)).collect();
        return Some(format!("{CANONICAL_PROFILE_PREFIX}{cleaned}"));
    }
    if href.contains("/in/") {
        return Some(href.to_string());
    }
    None
}

/// Extract the public handle from a profile URL.
///
/// Handles `/in/<handle>` and the historical `/pub/<name>/<a>/<b>/<c>` form,
/// where the handle is `<name>-` followed by the trailing segments reversed
/// and concatenated (`<c><b><a>`).
///
/// ```
/// use voyager_domain::utils::extract_handle_from_profile_url;
///
/// assert_eq!(
///     extract_handle_from_profile_url("https://www.linkedin.com/in/jane-doe/"),
///     Some("jane-doe".to_string())
/// );
/// assert_eq!(
///     extract_handle_from_profile_url("https://www.linkedin.com/pub/jane-doe/12/345/678"),
///     Some("jane-doe-67834512".to_string())
/// );
/// ```
#[must_use]
pub fn extract_handle_from_profile_url(profile_url: &str) -> Option<String> {
    let path = Url::parse(profile_url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| profile_url.to_string());
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();

    let marker = segments.iter().position(|segment| *segment == "in" || *segment == "pub")?;
    let rest = &segments[marker + 1..];
    let (name, trailing) = rest.split_first()?;

    if segments[marker] == "in" {
        return Some((*name).to_string());
    }

    if trailing.is_empty() {
        return Some((*name).to_string());
    }
    let reversed: String = trailing.iter().rev().copied().collect();
    Some(format!("{name}-{reversed}"))
}

/// Last `:`-separated component of a URN (`urn:li:fs_miniProfile:ACoAA` ->
/// `ACoAA`). Strings without a colon are returned unchanged.
#[must_use]
pub fn scrub_id_from_urn(urn: &str) -> String {
    urn.rsplit(':').next().unwrap_or_default().to_string()
}

/// Registrable root domain of a URL or bare host.
///
/// Keeps the last two labels, or three when the last two are both two-letter
/// labels (`example.co.uk`).
///
/// ```
/// use voyager_domain::utils::extract_root_domain;
///
/// assert_eq!(extract_root_domain("https://www.acme.com/about"), "acme.com");
/// assert_eq!(extract_root_domain("http://shop.acme.co.uk"), "acme.co.uk");
/// assert_eq!(extract_root_domain(""), "");
/// ```
#[must_use]
pub fn extract_root_domain(input: &str) -> String {
    let host = Url::parse(input)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| {
            input
                .split("//")
                .last()
                .unwrap_or_default()
                .split(['/', '?', '#', ':'])
                .next()
                .unwrap_or_default()
                .to_string()
        });

    let labels: Vec<&str> = host.split('.').filter(|label| !label.is_empty()).collect();
    let keep = match labels.as_slice() {
        [.., second_level, top_level]
            if labels.len() > 2 && second_level.len() == 2 && top_level.len() == 2 =>
        {
            3
        }
        _ => 2,
    };
    labels[labels.len().saturating_sub(keep)..].join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_urls_pass_through() {
        let url = "https://www.linkedin.com/in/jane-doe";
        assert_eq!(parse_profile_url_from_redirect(url), Some(url.to_string()));
    }

    #[test]
    fn people_tail_drops_punctuation_and_slashes() {
        assert_eq!(
            parse_profile_url_from_redirect("https://www.linkedin.com/people/jane-doe/"),
            Some("https://linkedin.com/in/janedoe".to_string())
        );
    }

    #[test]
    fn handle_ignores_query_string() {
        assert_eq!(
            extract_handle_from_profile_url("https://www.linkedin.com/in/jane?trk=x"),
            Some("jane".to_string())
        );
    }

    #[test]
    fn pub_url_with_only_name() {
        assert_eq!(
            extract_handle_from_profile_url("https://www.linkedin.com/pub/jane"),
            Some("jane".to_string())
        );
    }

    #[test]
    fn non_profile_url_has_no_handle() {
        assert_eq!(extract_handle_from_profile_url("https://www.linkedin.com/feed/"), None);
        assert_eq!(extract_handle_from_profile_url("https://www.linkedin.com/in/"), None);
    }

    #[test]
    fn handle_from_bare_path() {
        assert_eq!(extract_handle_from_profile_url("/in/jane"), Some("jane".to_string()));
    }

    #[test]
    fn urn_scrubbing() {
        assert_eq!(scrub_id_from_urn("urn:li:fs_miniProfile:ACoAAB"), "ACoAAB");
        assert_eq!(scrub_id_from_urn("plain"), "plain");
        assert_eq!(scrub_id_from_urn(""), "");
    }

    #[test]
    fn root_domain_of_bare_host() {
        assert_eq!(extract_root_domain("www.acme.io"), "acme.io");
        assert_eq!(extract_root_domain("acme.io"), "acme.io");
    }
}
