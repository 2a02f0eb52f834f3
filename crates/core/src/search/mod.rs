//! Search query planning
//!
//! Every search call is one of a fixed set of verticals. A vertical decides
//! the endpoint, the default query, an optional facet tag prepended to the
//! caller's filters, and a default decoration. [`plan_search`] layers these
//! in order:
//!
//! 1. endpoint defaults (`count`, `origin`, `q`, `start`, ...)
//! 2. vertical preset (`origin` overrides)
//! 3. default decoration, unless the caller supplies one
//! 4. caller overrides
//! 5. the facet list, built from the caller's `filters`/`guides` plus the tag

mod decorations;

pub use decorations::{GROUP_SEARCH_DECORATION, PROFILE_SEARCH_DECORATION, SCHOOL_SEARCH_DECORATION};

use std::fmt;

use voyager_domain::constants::{JOB_SEARCH_DECORATION_ID, MAX_SEARCH_COUNT};
use voyager_domain::{QueryMap, QueryValue};

const FILTERS_KEY: &str = "filters";
const GUIDES_KEY: &str = "guides";

/// Search endpoint under the API base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEndpoint {
    /// `search/hits`, guided or job search
    Hits,
    /// `search/blended`, mixed-vertical search
    Blended,
}

impl SearchEndpoint {
    /// Path relative to the API base.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Hits => "search/hits",
            Self::Blended => "search/blended",
        }
    }
}

/// Kind of search being issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchVertical {
    /// Blended search across every vertical
    All,
    People,
    Companies,
    /// Faceted blended search restricted to companies
    CompaniesExtended,
    Groups,
    Schools,
    /// Posts and articles
    Contents,
    Jobs,
}

impl SearchVertical {
    /// Every vertical, in a stable order.
    pub const ALL: [Self; 8] = [
        Self::All,
        Self::People,
        Self::Companies,
        Self::CompaniesExtended,
        Self::Groups,
        Self::Schools,
        Self::Contents,
        Self::Jobs,
    ];

    #[must_use]
    pub const fn endpoint(self) -> SearchEndpoint {
        match self {
            Self::All | Self::CompaniesExtended | Self::Contents => SearchEndpoint::Blended,
            Self::People | Self::Companies | Self::Groups | Self::Schools | Self::Jobs => {
                SearchEndpoint::Hits
            }
        }
    }

    /// Query key holding the facet list, if this vertical uses one.
    #[must_use]
    pub const fn facet_key(self) -> Option<&'static str> {
        match self {
            Self::People | Self::Companies | Self::Groups | Self::Schools => Some(GUIDES_KEY),
            Self::All | Self::CompaniesExtended | Self::Contents => Some(FILTERS_KEY),
            Self::Jobs => None,
        }
    }

    /// Tag appended to the caller's facets.
    #[must_use]
    pub const fn facet_tag(self) -> Option<&'static str> {
        match self {
            Self::People => Some("v->PEOPLE"),
            Self::Companies => Some("v->COMPANIES"),
            Self::Groups => Some("v->GROUPS"),
            Self::Schools => Some("v->SCHOOLS"),
            Self::CompaniesExtended => Some("resultType->COMPANIES"),
            Self::Contents => Some("resultType->CONTENT"),
            Self::All | Self::Jobs => None,
        }
    }

    /// Default decoration as `(key, value)`.
    #[must_use]
    pub const fn default_decoration(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::People => Some(("decoration", PROFILE_SEARCH_DECORATION)),
            Self::Groups => Some(("decoration", GROUP_SEARCH_DECORATION)),
            Self::Schools => Some(("decoration", SCHOOL_SEARCH_DECORATION)),
            Self::Jobs => Some(("decorationId", JOB_SEARCH_DECORATION_ID)),
            Self::All | Self::Companies | Self::CompaniesExtended | Self::Contents => None,
        }
    }

    fn base_query(self, count: u32) -> QueryMap {
        let mut query = QueryMap::new();
        query.insert("count".into(), QueryValue::scalar(count));
        query.insert("start".into(), QueryValue::scalar(0));
        match self {
            Self::People | Self::Companies | Self::Groups | Self::Schools => {
                query.insert(GUIDES_KEY.into(), QueryValue::List(Vec::new()));
                query.insert("origin".into(), QueryValue::scalar("OTHER"));
                query.insert("q".into(), QueryValue::scalar("guided"));
            }
            Self::All | Self::CompaniesExtended => {
                query.insert(FILTERS_KEY.into(), QueryValue::List(Vec::new()));
                query.insert("origin".into(), QueryValue::scalar("CLUSTER_EXPANSION"));
                query.insert("q".into(), QueryValue::scalar("all"));
                query.insert(
                    "queryContext".into(),
                    QueryValue::list(["spellCorrectionEnabled->true"]),
                );
            }
            Self::Contents => {
                query.insert(FILTERS_KEY.into(), QueryValue::List(Vec::new()));
                query.insert("origin".into(), QueryValue::scalar("GLOBAL_SEARCH_HEADER"));
                query.insert("q".into(), QueryValue::scalar("all"));
            }
            Self::Jobs => {
                query.insert("origin".into(), QueryValue::scalar("JOB_SEARCH_RESULTS_PAGE"));
                query.insert("q".into(), QueryValue::scalar("jserpAll"));
            }
        }
        query
    }

    fn apply_preset(self, query: &mut QueryMap) {
        match self {
            Self::All => {
                query.insert("origin".into(), QueryValue::scalar("SWITCH_SEARCH_VERTICAL"));
                query.insert(
                    "queryContext".into(),
                    QueryValue::list([
                        "spellCorrectionEnabled->true",
                        "relatedSearchesEnabled->true",
                        "kcardTypes->PROFILE|COMPANY|JOB_TITLE",
                    ]),
                );
            }
            Self::CompaniesExtended => {
                query.insert("origin".into(), QueryValue::scalar("FACETED_SEARCH"));
            }
            _ => {}
        }
    }
}

impl fmt::Display for SearchVertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::People => "people",
            Self::Companies => "companies",
            Self::CompaniesExtended => "companies_extended",
            Self::Groups => "groups",
            Self::Schools => "schools",
            Self::Contents => "contents",
            Self::Jobs => "jobs",
        };
        f.write_str(name)
    }
}

/// A fully resolved search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    pub vertical: SearchVertical,
    pub endpoint: SearchEndpoint,
    pub query: QueryMap,
}

/// Resolve the final query for a search.
///
/// `max_count` is the default page size; callers may still override `count`.
/// The facet list always wins over a `filters`/`guides` override, which is
/// folded into it instead.
///
/// ```
/// use voyager_core::search::{plan_search, SearchEndpoint, SearchVertical};
/// use voyager_core::query::{QueryMap, QueryValue};
///
/// let mut overrides = QueryMap::new();
/// overrides.insert("keywords".into(), QueryValue::scalar("rust"));
///
/// let plan = plan_search(SearchVertical::People, overrides, 49);
/// assert_eq!(plan.endpoint, SearchEndpoint::Hits);
/// assert_eq!(plan.query["guides"], QueryValue::list(["v->PEOPLE"]));
/// assert_eq!(plan.query["keywords"], QueryValue::scalar("rust"));
/// ```
#[must_use]
pub fn plan_search(vertical: SearchVertical, mut overrides: QueryMap, max_count: u32) -> SearchPlan {
    let facets = vertical.facet_key().map(|_| take_facets(&mut overrides, vertical.facet_tag()));

    let mut query = vertical.base_query(max_count.min(MAX_SEARCH_COUNT));
    vertical.apply_preset(&mut query);

    if let Some((key, decoration)) = vertical.default_decoration() {
        if !overrides.contains_key("decoration") && !overrides.contains_key("decorationId") {
            query.insert(key.into(), QueryValue::scalar(decoration));
        }
    }

    query.extend(overrides);

    if let (Some(key), Some(facets)) = (vertical.facet_key(), facets) {
        query.insert(key.into(), QueryValue::List(facets));
    }

    tracing::debug!(
        vertical = %vertical,
        endpoint = vertical.endpoint().path(),
        params = query.len(),
        "Planned search query"
    );
    SearchPlan { vertical, endpoint: vertical.endpoint(), query }
}

/// Pull the caller's facets out of `filters` (preferred) or `guides`,
/// promoting a scalar to a one-element list, and append the vertical's tag.
fn take_facets(overrides: &mut QueryMap, tag: Option<&str>) -> Vec<String> {
    let filters = overrides.remove(FILTERS_KEY);
    let guides = overrides.remove(GUIDES_KEY);
    let mut facets: Vec<String> = filters
        .or(guides)
        .map(QueryValue::into_items)
        .unwrap_or_default()
        .into_iter()
        .filter(|item| !item.is_empty())
        .collect();
    if let Some(tag) = tag {
        facets.push(tag.to_string());
    }
    facets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(entries: &[(&str, QueryValue)]) -> QueryMap {
        entries.iter().map(|(key, value)| ((*key).to_string(), value.clone())).collect()
    }

    #[test]
    fn default_count_never_exceeds_backend_limit() {
        for vertical in SearchVertical::ALL {
            let plan = plan_search(vertical, QueryMap::new(), 500);
            assert_eq!(plan.query["count"], QueryValue::scalar(49), "{vertical}");
            assert_eq!(plan.query["start"], QueryValue::scalar(0), "{vertical}");
        }
    }

    #[test]
    fn people_search_uses_guided_hits() {
        let plan = plan_search(SearchVertical::People, QueryMap::new(), 49);
        assert_eq!(plan.endpoint.path(), "search/hits");
        assert_eq!(plan.query["q"], QueryValue::scalar("guided"));
        assert_eq!(plan.query["origin"], QueryValue::scalar("OTHER"));
        assert_eq!(plan.query["guides"], QueryValue::list(["v->PEOPLE"]));
        assert_eq!(plan.query["decoration"], QueryValue::scalar(PROFILE_SEARCH_DECORATION));
    }

    #[test]
    fn caller_filters_are_prepended_to_the_vertical_tag() {
        let plan = plan_search(
            SearchVertical::People,
            overrides(&[("filters", QueryValue::list(["currentCompany->1035"]))]),
            49,
        );
        assert_eq!(plan.query["guides"], QueryValue::list(["currentCompany->1035", "v->PEOPLE"]));
        assert!(!plan.query.contains_key("filters"));
    }

    #[test]
    fn scalar_filter_is_promoted_to_a_list() {
        let plan = plan_search(
            SearchVertical::Contents,
            overrides(&[("filters", QueryValue::scalar("sortBy->date_posted"))]),
            49,
        );
        assert_eq!(
            plan.query["filters"],
            QueryValue::list(["sortBy->date_posted", "resultType->CONTENT"])
        );
    }

    #[test]
    fn company_search_has_no_decoration() {
        let plan = plan_search(SearchVertical::Companies, QueryMap::new(), 49);
        assert!(!plan.query.contains_key("decoration"));
        assert!(!plan.query.contains_key("decorationId"));
        assert_eq!(plan.query["guides"], QueryValue::list(["v->COMPANIES"]));
    }

    #[test]
    fn caller_decoration_replaces_default() {
        let plan = plan_search(
            SearchVertical::Groups,
            overrides(&[("decorationId", QueryValue::scalar("custom"))]),
            49,
        );
        assert!(!plan.query.contains_key("decoration"));
        assert_eq!(plan.query["decorationId"], QueryValue::scalar("custom"));
    }

    #[test]
    fn blended_all_search_sets_switch_origin_and_context() {
        let plan = plan_search(SearchVertical::All, QueryMap::new(), 49);
        assert_eq!(plan.endpoint, SearchEndpoint::Blended);
        assert_eq!(plan.query["origin"], QueryValue::scalar("SWITCH_SEARCH_VERTICAL"));
        assert_eq!(plan.query["filters"], QueryValue::List(Vec::new()));
        match &plan.query["queryContext"] {
            QueryValue::List(items) => assert_eq!(items.len(), 3),
            other => panic!("unexpected queryContext {other:?}"),
        }
    }

    #[test]
    fn extended_company_search_is_faceted() {
        let plan = plan_search(SearchVertical::CompaniesExtended, QueryMap::new(), 49);
        assert_eq!(plan.query["origin"], QueryValue::scalar("FACETED_SEARCH"));
        assert_eq!(plan.query["filters"], QueryValue::list(["resultType->COMPANIES"]));
    }

    #[test]
    fn job_search_passes_filters_through() {
        let plan = plan_search(
            SearchVertical::Jobs,
            overrides(&[
                ("keywords", QueryValue::scalar("rust")),
                ("filters", QueryValue::list(["locationFallback->Berlin"])),
            ]),
            49,
        );
        assert_eq!(plan.endpoint.path(), "search/hits");
        assert_eq!(plan.query["q"], QueryValue::scalar("jserpAll"));
        assert_eq!(plan.query["decorationId"], QueryValue::scalar(JOB_SEARCH_DECORATION_ID));
        assert_eq!(plan.query["filters"], QueryValue::list(["locationFallback->Berlin"]));
    }

    #[test]
    fn caller_overrides_win_over_defaults() {
        let plan = plan_search(
            SearchVertical::Schools,
            overrides(&[("count", QueryValue::scalar(10)), ("origin", QueryValue::scalar("X"))]),
            49,
        );
        assert_eq!(plan.query["count"], QueryValue::scalar(10));
        assert_eq!(plan.query["origin"], QueryValue::scalar("X"));
    }
}
