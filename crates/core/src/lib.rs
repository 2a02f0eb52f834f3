//! # Voyager Core
//!
//! Protocol logic and ports for the Voyager client.
//!
//! This crate contains:
//! - Query-string encoding for the Rest.li list syntax
//! - Search query planning per vertical
//! - Multi-resource profile composition
//! - Normalizer ports and their default implementations
//! - The cookie-source port consumed by session management
//!
//! ## Architecture
//! - Depends only on `voyager-domain`
//! - No I/O

pub mod profile;
pub mod query;
pub mod search;
pub mod session_ports;
pub mod transform;

pub use profile::{merge_profile_parts, unwrap_resource_payload, ProfileResource};
pub use query::{append_query, decode_query, encode_query};
pub use search::{plan_search, SearchEndpoint, SearchPlan, SearchVertical};
pub use session_ports::CookieSource;
pub use transform::{
    CompanyNormalizer, JsonResumeNormalizer, LinkedInCompanyNormalizer, ProfileNormalizer,
};
