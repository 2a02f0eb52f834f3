use voyager_domain::{QueryMap, QueryValue};

/// Percent-encode a rendered list literal. Escapes `!'()*` on top of the
/// usual component set.
#[must_use]
pub fn encode_list_value(rendered: &str) -> String {
    urlencoding::encode(rendered).into_owned()
}

/// Escapes `urlencoding` applies that a scalar keeps literal: the
/// `encodeURIComponent` marks plus the comma.
const SCALAR_LITERALS: [(&str, &str); 6] =
    [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*"), ("%2C", ",")];

/// Percent-encode a scalar as a URI component, leaving `!'()*` and literal
/// commas unescaped.
///
/// A literal `%` is always emitted as `%25`, so every remaining `%XX` is an
/// escape produced here and can be reverted safely.
#[must_use]
pub fn encode_scalar(value: &str) -> String {
    SCALAR_LITERALS
        .iter()
        .fold(urlencoding::encode(value).into_owned(), |encoded, (escape, literal)| {
            encoded.replace(escape, literal)
        })
}

/// Flatten a query mapping into a single query string.
///
/// List-valued entries come first, then scalars; each group in key order.
///
/// ```
/// use voyager_core::query::{encode_query, QueryMap, QueryValue};
///
/// let mut query = QueryMap::new();
/// query.insert("count".into(), QueryValue::scalar(49));
/// query.insert("filters".into(), QueryValue::list(["v->PEOPLE", "v->COMPANIES"]));
/// query.insert("keywords".into(), QueryValue::scalar("rust,tokio"));
///
/// assert_eq!(
///     encode_query(&query),
///     "filters=List%28v-%3EPEOPLE%2Cv-%3ECOMPANIES%29&count=49&keywords=rust,tokio"
/// );
/// ```
#[must_use]
pub fn encode_query(query: &QueryMap) -> String {
    let lists = query.iter().filter(|(_, value)| value.is_list()).map(|(key, value)| {
        format!("{}={}", urlencoding::encode(key), encode_list_value(&value.render()))
    });
    let scalars = query.iter().filter(|(_, value)| !value.is_list()).map(|(key, value)| {
        format!("{}={}", urlencoding::encode(key), encode_scalar(&value.render()))
    });
    lists.chain(scalars).collect::<Vec<_>>().join("&")
}

/// Append an encoded query mapping to a URI that may already carry a query.
#[must_use]
pub fn append_query(uri: &str, query: &QueryMap) -> String {
    if query.is_empty() {
        return uri.to_string();
    }
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}{}", encode_query(query))
}

/// Parse a query string back into a mapping, recognising `List(...)` literals.
///
/// Pairs that fail to percent-decode are kept verbatim.
#[must_use]
pub fn decode_query(query_string: &str) -> QueryMap {
    query_string
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), QueryValue::from_literal(&decode_component(value)))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |decoded| decoded.into_owned())
}
