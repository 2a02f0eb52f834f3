//! Voyager API client
//!
//! Layered bottom-up:
//!
//! - [`executor`]: paced dispatch and response classification
//! - [`session`]: CSRF token lifecycle, handshake and challenge handling
//! - [`resources`]: profile, company, group, search and email lookups
//! - [`client`]: one-account facade wiring the layers together
//!
//! # Architecture
//!
//! - One cookie jar per client, shared by transport and session
//! - Pacing before every dispatch, including handshake calls
//! - No retries; failures are classified for the caller to act on

pub mod client;
pub mod errors;
pub mod executor;
pub mod resources;
pub mod session;

pub use client::{VoyagerClient, VoyagerClientBuilder};
pub use errors::{ApiError, ApiErrorCategory};
pub use executor::{ExecutorResponse, RawResponse, RequestExecutor};
pub use resources::{FailurePolicy, ResourceClient};
pub use session::{with_api_headers, AccessTokenProvider, SessionManager};
