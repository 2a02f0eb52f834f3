//! Configuration loading
//!
//! Loads [`ClientConfig`](voyager_domain::ClientConfig) from environment
//! variables or files. Credentials are never loaded here.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
