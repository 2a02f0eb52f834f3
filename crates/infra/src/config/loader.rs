//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Overlay any `VOYAGER_*` environment variables on the defaults
//! 2. If none are set, fall back to a config file
//! 3. Probe a fixed list of paths when no file is given
//! 4. JSON and TOML are both accepted, detected by extension
//!
//! ## Environment Variables
//! - `VOYAGER_BASE_URL`: API prefix
//! - `VOYAGER_AUTH_URL`: login handshake endpoint
//! - `VOYAGER_EMAIL_LOOKUP_URL`: email to profile redirect endpoint
//! - `VOYAGER_PACING_MIN_MS`: lower bound of the pacing window
//! - `VOYAGER_PACING_MAX_MS`: upper bound of the pacing window (exclusive)
//! - `VOYAGER_TIMEOUT_SECS`: transport timeout
//! - `VOYAGER_MAX_SEARCH_COUNT`: default search page size
//!
//! ## File Locations
//! Probed relative to the working directory, in order:
//! 1. `./voyager.toml`, `./voyager.json`
//! 2. `./config/voyager.toml`, `./config/voyager.json`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use voyager_domain::{ClientConfig, Result, VoyagerError};

const ENV_BASE_URL: &str = "VOYAGER_BASE_URL";
const ENV_AUTH_URL: &str = "VOYAGER_AUTH_URL";
const ENV_EMAIL_LOOKUP_URL: &str = "VOYAGER_EMAIL_LOOKUP_URL";
const ENV_PACING_MIN_MS: &str = "VOYAGER_PACING_MIN_MS";
const ENV_PACING_MAX_MS: &str = "VOYAGER_PACING_MAX_MS";
const ENV_TIMEOUT_SECS: &str = "VOYAGER_TIMEOUT_SECS";
const ENV_MAX_SEARCH_COUNT: &str = "VOYAGER_MAX_SEARCH_COUNT";

const ALL_ENV_VARS: [&str; 7] = [
    ENV_BASE_URL,
    ENV_AUTH_URL,
    ENV_EMAIL_LOOKUP_URL,
    ENV_PACING_MIN_MS,
    ENV_PACING_MAX_MS,
    ENV_TIMEOUT_SECS,
    ENV_MAX_SEARCH_COUNT,
];

/// Load configuration with automatic fallback strategy
///
/// Environment variables win when at least one is set; otherwise the first
/// config file found is used.
///
/// # Errors
/// Returns `VoyagerError::Config` if:
/// - No environment variable is set and no config file is found
/// - A value or file is malformed
/// - The resulting configuration fails validation
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Unset variables keep their defaults.
///
/// # Errors
/// Returns `VoyagerError::Config` if no `VOYAGER_*` variable is set, if a
/// numeric variable does not parse, or if validation fails.
pub fn load_from_env() -> Result<ClientConfig> {
    if ALL_ENV_VARS.iter().all(|key| std::env::var(key).is_err()) {
        return Err(VoyagerError::Config("No VOYAGER_* environment variables set".to_string()));
    }

    let mut config = ClientConfig::default();
    if let Some(value) = env_opt(ENV_BASE_URL) {
        config.base_url = value;
    }
    if let Some(value) = env_opt(ENV_AUTH_URL) {
        config.auth_url = value;
    }
    if let Some(value) = env_opt(ENV_EMAIL_LOOKUP_URL) {
        config.email_lookup_url = value;
    }
    if let Some(value) = env_parse(ENV_PACING_MIN_MS)? {
        config.pacing.min_delay_ms = value;
    }
    if let Some(value) = env_parse(ENV_PACING_MAX_MS)? {
        config.pacing.max_delay_ms = value;
    }
    if let Some(value) = env_parse(ENV_TIMEOUT_SECS)? {
        config.timeout_secs = value;
    }
    if let Some(value) = env_parse(ENV_MAX_SEARCH_COUNT)? {
        config.max_search_count = value;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Fields missing from
/// the file keep their defaults.
///
/// # Errors
/// Returns `VoyagerError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The parsed configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VoyagerError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            VoyagerError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VoyagerError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| VoyagerError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VoyagerError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(VoyagerError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    [
        cwd.join("voyager.toml"),
        cwd.join("voyager.json"),
        cwd.join("config").join("voyager.toml"),
        cwd.join("config").join("voyager.json"),
    ]
    .into_iter()
    .find(|path| path.exists())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional numeric environment variable
///
/// # Errors
/// Returns `VoyagerError::Config` if the variable is set but not a number.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| VoyagerError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
