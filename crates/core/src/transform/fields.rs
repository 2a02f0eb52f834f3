//! Lenient field access over raw payloads
//!
//! Upstream payloads omit fields freely; every accessor falls back to an
//! empty value instead of failing.

use serde_json::Value;

/// String at `pointer`, or empty.
pub(crate) fn text(value: &Value, pointer: &str) -> String {
    value.pointer(pointer).and_then(Value::as_str).unwrap_or_default().to_string()
}

/// First non-empty string among `pointers`.
pub(crate) fn first_text(value: &Value, pointers: &[&str]) -> String {
    pointers
        .iter()
        .map(|pointer| text(value, pointer))
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
}

/// String or number at `pointer` rendered as text.
pub(crate) fn scalar_text(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Items of the `elements` array under `pointer`.
pub(crate) fn elements<'a>(value: &'a Value, pointer: &str) -> impl Iterator<Item = &'a Value> {
    value
        .pointer(&format!("{pointer}/elements"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Value at `pointer`, or `fallback`.
pub(crate) fn or_default(value: &Value, pointer: &str, fallback: Value) -> Value {
    value.pointer(pointer).filter(|found| !found.is_null()).cloned().unwrap_or(fallback)
}

/// `year-month-31`, or `year-12-31` when the month is unknown.
pub(crate) fn month_end(date: Option<&Value>) -> String {
    let Some(date) = date.filter(|date| date.is_object()) else {
        return String::new();
    };
    let Some(year) = scalar_text(date, "/year") else {
        return String::new();
    };
    match scalar_text(date, "/month") {
        Some(month) => format!("{year}-{month}-31"),
        None => format!("{year}-12-31"),
    }
}

/// `year-12-31` for year-granular periods.
pub(crate) fn year_end(date: Option<&Value>) -> String {
    date.and_then(|date| scalar_text(date, "/year"))
        .map(|year| format!("{year}-12-31"))
        .unwrap_or_default()
}

/// Largest rendition of a vector image: `rootUrl` plus the last artifact's
/// path segment. The image object is keyed by its type name.
pub(crate) fn image_path(resource: &Value) -> String {
    let Some(image) = resource.as_object().and_then(|map| map.values().next()) else {
        return String::new();
    };
    let root = text(image, "/rootUrl");
    if root.is_empty() {
        return root;
    }
    let segment = image
        .get("artifacts")
        .and_then(Value::as_array)
        .and_then(|artifacts| artifacts.last())
        .map(|artifact| text(artifact, "/fileIdentifyingUrlPathSegment"))
        .unwrap_or_default();
    format!("{root}{segment}")
}
