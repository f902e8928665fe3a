//! API-specific error types
//!
//! Error classification for API operations. The one distinction the endpoint
//! resolver depends on is "route not found" versus everything else: a 404
//! means "this candidate path does not exist on this deployment" and triggers
//! fallthrough to the next candidate, while every other failure is terminal.

use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Invalid input (empty required field, backend 400) - caller bug
    Validation,
    /// Authentication errors (401, 403) - credential missing/invalid or wrong role
    Authentication,
    /// Route not found (404) - candidate path absent, resolver may fall through
    RouteNotFound,
    /// Server errors (5xx) - backend failure
    Backend,
    /// Network/connection errors
    Network,
    /// Configuration errors - client misconfiguration
    Config,
    /// Any other non-success status - terminal, never triggers fallthrough
    Unexpected,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("No matching route: {path}")]
    RouteNotFound { path: String },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected status {status}: {message}")]
    Unexpected { status: u16, message: String },
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Validation(_) => ApiErrorCategory::Validation,
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RouteNotFound { .. } => ApiErrorCategory::RouteNotFound,
            Self::Backend(_) => ApiErrorCategory::Backend,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
            Self::Unexpected { .. } => ApiErrorCategory::Unexpected,
        }
    }

    /// Whether the endpoint resolver may advance to the next candidate path
    /// after observing this error. Only the specific "route not found" signal
    /// qualifies; any other error must be surfaced immediately.
    pub fn is_route_not_found(&self) -> bool {
        matches!(self, Self::RouteNotFound { .. })
    }
}

/// Convert transport errors into the API taxonomy
impl From<fleetwatch_domain::FleetError> for ApiError {
    fn from(err: fleetwatch_domain::FleetError) -> Self {
        use fleetwatch_domain::FleetError;

        match err {
            FleetError::Network(message) => Self::Network(message),
            FleetError::Auth(message) => Self::Auth(message),
            FleetError::Config(message) => Self::Config(message),
            FleetError::NotFound(message) => Self::RouteNotFound { path: message },
            FleetError::InvalidInput(message) => Self::Validation(message),
            FleetError::Internal(message) => Self::Backend(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::Validation("test".to_string()).category(),
            ApiErrorCategory::Validation
        );
        assert_eq!(ApiError::Auth("test".to_string()).category(), ApiErrorCategory::Authentication);
        assert_eq!(
            ApiError::RouteNotFound { path: "/devices".to_string() }.category(),
            ApiErrorCategory::RouteNotFound
        );
        assert_eq!(ApiError::Backend("test".to_string()).category(), ApiErrorCategory::Backend);
        assert_eq!(ApiError::Network("test".to_string()).category(), ApiErrorCategory::Network);
        assert_eq!(
            ApiError::Unexpected { status: 405, message: "test".to_string() }.category(),
            ApiErrorCategory::Unexpected
        );
    }

    #[test]
    fn test_only_404_permits_fallthrough() {
        assert!(ApiError::RouteNotFound { path: "/devices".to_string() }.is_route_not_found());

        assert!(!ApiError::Validation("test".to_string()).is_route_not_found());
        assert!(!ApiError::Auth("test".to_string()).is_route_not_found());
        assert!(!ApiError::Backend("test".to_string()).is_route_not_found());
        assert!(!ApiError::Network("test".to_string()).is_route_not_found());
        assert!(!ApiError::Unexpected { status: 405, message: "test".to_string() }
            .is_route_not_found());
    }

    #[test]
    fn test_transport_errors_map_into_taxonomy() {
        use fleetwatch_domain::FleetError;

        let err: ApiError = FleetError::Network("connection refused".to_string()).into();
        assert_eq!(err.category(), ApiErrorCategory::Network);

        let err: ApiError = FleetError::Config("bad base url".to_string()).into();
        assert_eq!(err.category(), ApiErrorCategory::Config);
    }
}
