//! Resilience patterns for outbound traffic
//!
//! - **Pacing**: randomized inter-request delay ([`JitterPacer`]) behind the
//!   [`RequestPacer`] trait so callers can inject deterministic pacers in tests

pub mod pacer;

pub use pacer::{JitterPacer, PacerError, RequestPacer};
