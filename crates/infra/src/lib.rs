//! # Voyager Infrastructure
//!
//! I/O side of the Voyager client.
//!
//! This crate contains:
//! - The HTTP transport and per-client cookie jar
//! - Request execution, session management and resource operations
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements ports defined in `voyager-core`
//! - Depends on `voyager-common`, `voyager-core` and `voyager-domain`
//! - Contains all network code
//!
//! ## Example
//!
//! ```no_run
//! use voyager_domain::Credentials;
//! use voyager_infra::api::VoyagerClient;
//!
//! # async fn example() -> Result<(), voyager_infra::api::ApiError> {
//! let client = VoyagerClient::builder()
//!     .config(voyager_infra::config::load()?)
//!     .credentials(Credentials::new("me@example.com", "secret"))
//!     .build()?;
//! client.initialize().await?;
//! let profile = client.fetch_profile("jdoe").await?;
//! println!("{}", profile["basics"]["name"]);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

pub use api::{ApiError, FailurePolicy, VoyagerClient, VoyagerClientBuilder};
pub use errors::InfraError;
pub use http::{HttpClient, SessionCookieJar};
