use sitebuilder_backend::BackendError;
use sitebuilder_core::error::CoreError;

/// Errors surfaced by the gateway.
///
/// Cloneable so that one failed fetch can be handed to every caller that
/// was coalesced onto it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Form-level schema check failed before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// A write named a component type this build does not know.
    #[error("Unknown component_type: '{0}'")]
    UnknownComponentType(String),

    /// The backend rejected the request or could not be reached. `message`
    /// is the backend's own text.
    #[error("{message}")]
    Backend { status: Option<u16>, message: String },
}

impl GatewayError {
    /// HTTP status the backend answered with, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<BackendError> for GatewayError {
    fn from(err: BackendError) -> Self {
        GatewayError::Backend {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for GatewayError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => GatewayError::Validation(message),
            other => GatewayError::Validation(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for GatewayError {
    fn from(errors: validator::ValidationErrors) -> Self {
        GatewayError::Validation(errors.to_string())
    }
}
