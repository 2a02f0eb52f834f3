//! Common utilities shared across Voyager crates.
//!
//! # Feature Tiers
//!
//! - default: resilience primitives (request pacing)
//! - `test-utils`: mock implementations for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod resilience;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use resilience::{JitterPacer, PacerError, RequestPacer};
