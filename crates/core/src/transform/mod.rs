//! Response reshaping
//!
//! Raw Voyager payloads are handed to a [`ProfileNormalizer`] or
//! [`CompanyNormalizer`]. The defaults produce a JSON-Resume-shaped profile
//! and a flat company record; callers may inject their own.

mod company;
mod fields;
mod ports;
mod profile;

pub use company::LinkedInCompanyNormalizer;
pub use ports::{CompanyNormalizer, ProfileNormalizer};
pub use profile::JsonResumeNormalizer;
