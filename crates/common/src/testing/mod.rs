//! Testing utilities
//!
//! - **[`mocks`]**: Mock implementations of common traits

pub mod mocks;

pub use mocks::RecordingPacer;
