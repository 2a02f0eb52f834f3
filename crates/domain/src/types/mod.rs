//! Domain types and models

pub mod request;
pub mod session;

pub use request::{HeaderList, HttpMethod, QueryMap, QueryValue, RequestBody, RequestDescriptor};
pub use session::{ChallengePayload, Credentials, CsrfToken, SessionIdentity, SessionState};
