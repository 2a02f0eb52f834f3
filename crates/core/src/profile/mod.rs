//! Multi-resource profile composition
//!
//! A full profile is assembled from several `identity/profiles/{id}/...`
//! resources fetched concurrently and merged field by field.

use std::fmt;

use serde_json::{Map, Value};

/// One sub-resource of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileResource {
    /// Primary view; the only resource whose failure is fatal
    View,
    ContactInfo,
    Highlights,
    Skills,
    PositionGroups,
}

impl ProfileResource {
    /// Resources of a full fetch, in merge order.
    pub const FULL: [Self; 5] =
        [Self::View, Self::ContactInfo, Self::Highlights, Self::Skills, Self::PositionGroups];

    /// Resources of a light fetch.
    pub const LIGHT: [Self; 1] = [Self::View];

    /// Resources to fetch for the requested depth.
    #[must_use]
    pub fn for_depth(light: bool) -> &'static [Self] {
        if light {
            &Self::LIGHT
        } else {
            &Self::FULL
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::View => "profileView",
            Self::ContactInfo => "profileContactInfo",
            Self::Highlights => "highlights",
            Self::Skills => "skills",
            Self::PositionGroups => "positionGroups",
        }
    }

    /// Whether the resource is a paged collection.
    #[must_use]
    pub const fn is_paged(self) -> bool {
        matches!(self, Self::Skills | Self::PositionGroups)
    }

    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::View)
    }

    /// URI of this resource for `profile_id` under `base_url`.
    ///
    /// ```
    /// use voyager_core::profile::ProfileResource;
    ///
    /// assert_eq!(
    ///     ProfileResource::Skills.uri("https://h/api", "jdoe", 49),
    ///     "https://h/api/identity/profiles/jdoe/skills?count=49&start=0"
    /// );
    /// ```
    #[must_use]
    pub fn uri(self, base_url: &str, profile_id: &str, page_size: u32) -> String {
        let base = base_url.trim_end_matches('/');
        let segment = self.segment();
        if self.is_paged() {
            format!("{base}/identity/profiles/{profile_id}/{segment}?count={page_size}&start=0")
        } else {
            format!("{base}/identity/profiles/{profile_id}/{segment}")
        }
    }
}

impl fmt::Display for ProfileResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// Unwrap a resource payload: responses wrapping their entity as
/// `{"data": {"element": ...}}` contribute the inner element.
#[must_use]
pub fn unwrap_resource_payload(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.contains_key("data") => map
            .remove("data")
            .and_then(|data| match data {
                Value::Object(mut data) => data.remove("element"),
                _ => None,
            })
            .unwrap_or(Value::Null),
        other => other,
    }
}

/// Merge resource payloads into one record seeded with `identifier`.
///
/// Later parts overwrite earlier ones on key collision. Non-object parts
/// contribute nothing.
///
/// ```
/// use serde_json::json;
/// use voyager_core::profile::merge_profile_parts;
///
/// let merged = merge_profile_parts("jdoe", [json!({"a": 1, "b": 1}), json!({"b": 2})]);
/// assert_eq!(merged, json!({"identifier": "jdoe", "a": 1, "b": 2}));
/// ```
#[must_use]
pub fn merge_profile_parts<I>(identifier: &str, parts: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut merged = Map::new();
    merged.insert("identifier".to_string(), Value::String(identifier.to_string()));
    for part in parts {
        if let Value::Object(fields) = part {
            merged.extend(fields);
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn full_fetch_lists_primary_first() {
        let resources = ProfileResource::for_depth(false);
        assert_eq!(resources.len(), 5);
        assert!(resources[0].is_primary());
        assert_eq!(ProfileResource::for_depth(true), &[ProfileResource::View]);
    }

    #[test]
    fn unpaged_uri_has_no_query() {
        assert_eq!(
            ProfileResource::ContactInfo.uri("https://h/api/", "jdoe", 49),
            "https://h/api/identity/profiles/jdoe/profileContactInfo"
        );
    }

    #[test]
    fn wrapped_payload_contributes_inner_element() {
        let payload = json!({"data": {"element": {"skills": ["rust"]}}});
        assert_eq!(unwrap_resource_payload(payload), json!({"skills": ["rust"]}));
        assert_eq!(unwrap_resource_payload(json!({"data": 1})), Value::Null);
        assert_eq!(unwrap_resource_payload(json!({"x": 1})), json!({"x": 1}));
    }

    #[test]
    fn merge_order_decides_collisions() {
        let merged = merge_profile_parts(
            "jdoe",
            [json!({"identifier": "override", "profile": {"a": 1}}), json!({"profile": {"b": 2}})],
        );
        assert_eq!(merged["identifier"], "override");
        assert_eq!(merged["profile"], json!({"b": 2}));
    }

    #[test]
    fn non_object_parts_are_ignored() {
        let merged = merge_profile_parts("jdoe", [Value::Null, json!([1, 2]), json!({"k": true})]);
        assert_eq!(merged, json!({"identifier": "jdoe", "k": true}));
    }
}
