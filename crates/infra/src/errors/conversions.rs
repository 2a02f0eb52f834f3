//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use voyager_domain::VoyagerError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VoyagerError);

impl From<InfraError> for VoyagerError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VoyagerError> for InfraError {
    fn from(value: VoyagerError) -> Self {
        InfraError(value)
    }
}

trait IntoVoyagerError {
    fn into_voyager(self) -> VoyagerError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VoyagerError */
/* -------------------------------------------------------------------------- */

impl IntoVoyagerError for HttpError {
    fn into_voyager(self) -> VoyagerError {
        if self.is_timeout() {
            return VoyagerError::Timeout("HTTP request timed out".into());
        }

        if self.is_builder() {
            return VoyagerError::Config(format!("invalid HTTP request: {self}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return VoyagerError::Network("HTTP connection failure".into());
        }

        if self.is_redirect() {
            return VoyagerError::Network(format!("redirect loop: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => VoyagerError::NotFound(message),
                400..=499 => VoyagerError::InvalidInput(message),
                _ => VoyagerError::Network(message),
            };
        }

        VoyagerError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_voyager())
    }
}
