//! # Voyager Domain
//!
//! Domain types for the Voyager client.
//!
//! This crate contains:
//! - Error types and the `Result` alias
//! - Session, credential and request descriptor types
//! - Client configuration structures
//! - Protocol constants and pure URL helpers
//!
//! ## Architecture
//! - No dependencies on other Voyager crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
