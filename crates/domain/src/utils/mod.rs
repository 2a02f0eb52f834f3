//! Pure helper functions

pub mod profile_url;

pub use profile_url::{
    extract_handle_from_profile_url, extract_root_domain, parse_profile_url_from_redirect,
    scrub_id_from_urn,
};
