//! # Handler Errors
//!
//! Two layers of errors live here:
//!
//! - [`ServiceError`] is what a remote service client reports: a fault kind, the service
//!   message and, when the service sent one, a request id.
//! - [`HandlerError`] is the classified taxonomy the pipelines work with. Faults are
//!   classified exactly once, at the remote call (see [`crate::executor`]), and every
//!   terminal failure names the resource type and identifier it concerns.
//!
//! [`HandlerErrorCode`] is the serializable code that ends up in a `FAILED`
//! [`ProgressEvent`](crate::ProgressEvent).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Fault categories a remote service client can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceErrorKind {
    NotFound,
    BadRequest,
    LimitExceeded,
    Unauthorized,
    Throttling,
    InternalFailure,
    DependentService,
    Other,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceErrorKind::NotFound => "NotFoundException",
            ServiceErrorKind::BadRequest => "BadRequestException",
            ServiceErrorKind::LimitExceeded => "LimitExceededException",
            ServiceErrorKind::Unauthorized => "UnauthorizedException",
            ServiceErrorKind::Throttling => "ThrottlingException",
            ServiceErrorKind::InternalFailure => "InternalFailureException",
            ServiceErrorKind::DependentService => "DependentServiceFailureException",
            ServiceErrorKind::Other => "ServiceException",
        };
        f.write_str(name)
    }
}

/// A fault returned by the remote service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
    pub request_id: Option<String>,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            request_id: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::InternalFailure, message)
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Error codes reported in a `FAILED` progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    NotFound,
    InvalidRequest,
    AlreadyExists,
    AccessDenied,
    ServiceLimitExceeded,
    ServiceInternalError,
    Throttled,
    NotStabilized,
    GeneralServiceError,
    InternalFailure,
}

impl HandlerErrorCode {
    /// Transient codes the invoking framework may retry at invocation level.
    /// The pipelines themselves never retry.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            HandlerErrorCode::Throttled | HandlerErrorCode::ServiceInternalError
        )
    }
}

impl fmt::Display for HandlerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Classified handler failures.
///
/// Every variant names the resource type and the best identifier known at the time
/// of the failure, so a terminal message always says which resource it is about.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HandlerError {
    /// The caller supplied an invalid request (e.g. a read-only property on create).
    #[error("Invalid request for resource of type '{type_name}' with identifier '{identifier}': {message}")]
    InvalidRequest {
        type_name: &'static str,
        identifier: String,
        message: String,
    },

    /// The resource does not exist.
    ///
    /// Fatal for read, update and the delete call itself. During delete
    /// stabilization the same error means "gone", which is the goal.
    #[error("Resource of type '{type_name}' with identifier '{identifier}' was not found.")]
    NotFound {
        type_name: &'static str,
        identifier: String,
    },

    #[error("Resource of type '{type_name}' with identifier '{identifier}' already exists.")]
    AlreadyExists {
        type_name: &'static str,
        identifier: String,
    },

    #[error("Access denied for operation '{operation}' on resource of type '{type_name}' with identifier '{identifier}': {message}")]
    AccessDenied {
        type_name: &'static str,
        identifier: String,
        operation: String,
        message: String,
    },

    #[error("Limit exceeded for resource of type '{type_name}' with identifier '{identifier}': {message}")]
    ServiceLimitExceeded {
        type_name: &'static str,
        identifier: String,
        message: String,
    },

    #[error("Internal error reported from downstream service during operation '{operation}' on resource of type '{type_name}' with identifier '{identifier}': {message}")]
    ServiceInternalError {
        type_name: &'static str,
        identifier: String,
        operation: String,
        message: String,
    },

    #[error("Rate exceeded for operation '{operation}' on resource of type '{type_name}' with identifier '{identifier}': {message}")]
    Throttled {
        type_name: &'static str,
        identifier: String,
        operation: String,
        message: String,
    },

    /// The remote service reported a failure state, or polling hit an unexpected fault.
    #[error("Resource of type '{type_name}' with identifier '{identifier}' did not stabilize{}", reason_suffix(.reason))]
    NotStabilized {
        type_name: &'static str,
        identifier: String,
        reason: Option<String>,
    },

    /// The resource never reached a stable state within the configured timeout.
    #[error("Resource of type '{type_name}' with identifier '{identifier}' did not stabilize within {} seconds.", .timeout.as_secs())]
    StabilizationTimedOut {
        type_name: &'static str,
        identifier: String,
        timeout: Duration,
    },

    #[error("Error occurred during operation '{operation}' on resource of type '{type_name}' with identifier '{identifier}': {message}")]
    GeneralServiceError {
        type_name: &'static str,
        identifier: String,
        operation: String,
        message: String,
    },

    /// A failure inside the handler machinery itself, not the remote service.
    #[error("Internal failure in handler for resource of type '{type_name}' with identifier '{identifier}': {message}")]
    InternalFailure {
        type_name: &'static str,
        identifier: String,
        message: String,
    },
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(": {reason}"),
        None => ".".to_string(),
    }
}

impl HandlerError {
    pub fn code(&self) -> HandlerErrorCode {
        match self {
            HandlerError::InvalidRequest { .. } => HandlerErrorCode::InvalidRequest,
            HandlerError::NotFound { .. } => HandlerErrorCode::NotFound,
            HandlerError::AlreadyExists { .. } => HandlerErrorCode::AlreadyExists,
            HandlerError::AccessDenied { .. } => HandlerErrorCode::AccessDenied,
            HandlerError::ServiceLimitExceeded { .. } => HandlerErrorCode::ServiceLimitExceeded,
            HandlerError::ServiceInternalError { .. } => HandlerErrorCode::ServiceInternalError,
            HandlerError::Throttled { .. } => HandlerErrorCode::Throttled,
            HandlerError::NotStabilized { .. } | HandlerError::StabilizationTimedOut { .. } => {
                HandlerErrorCode::NotStabilized
            }
            HandlerError::GeneralServiceError { .. } => HandlerErrorCode::GeneralServiceError,
            HandlerError::InternalFailure { .. } => HandlerErrorCode::InternalFailure,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    pub fn invalid_request(
        type_name: &'static str,
        identifier: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        HandlerError::InvalidRequest {
            type_name,
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    pub fn not_found(type_name: &'static str, identifier: impl Into<String>) -> Self {
        HandlerError::NotFound {
            type_name,
            identifier: identifier.into(),
        }
    }

    pub fn not_stabilized(
        type_name: &'static str,
        identifier: impl Into<String>,
        reason: Option<String>,
    ) -> Self {
        HandlerError::NotStabilized {
            type_name,
            identifier: identifier.into(),
            reason,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HandlerError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_map_to_taxonomy() {
        let timed_out = HandlerError::StabilizationTimedOut {
            type_name: "AWS::Amplify::Domain",
            identifier: "arn".into(),
            timeout: Duration::from_secs(600),
        };
        let failed = HandlerError::not_stabilized("AWS::Amplify::Domain", "arn", Some("boom".into()));

        assert_eq!(timed_out.code(), HandlerErrorCode::NotStabilized);
        assert_eq!(failed.code(), HandlerErrorCode::NotStabilized);
        assert_ne!(timed_out, failed);
    }

    #[test]
    fn test_only_transient_codes_are_retryable() {
        let throttled = HandlerError::Throttled {
            type_name: "AWS::Amplify::App",
            identifier: "d1".into(),
            operation: "GetApp".into(),
            message: "slow down".into(),
        };
        assert!(throttled.is_retryable());
        assert!(!HandlerError::not_found("AWS::Amplify::App", "d1").is_retryable());
        assert!(!HandlerError::invalid_request("AWS::Amplify::App", "d1", "bad").is_retryable());
    }

    #[test]
    fn test_messages_name_type_and_identifier() {
        let err = HandlerError::not_stabilized(
            "AWS::Amplify::Domain",
            "arn:aws:amplify:us-east-1:123456789012:apps/d1/domains/example.com",
            Some("Unable to verify domain ownership".into()),
        );
        let message = err.to_string();
        assert!(message.contains("AWS::Amplify::Domain"));
        assert!(message.contains("apps/d1/domains/example.com"));
        assert!(message.ends_with("Unable to verify domain ownership"));

        let without_reason = HandlerError::not_stabilized("AWS::Amplify::App", "d1", None);
        assert!(without_reason.to_string().ends_with("did not stabilize."));

        let invalid = HandlerError::invalid_request("AWS::Amplify::App", "d1", "Name is required");
        assert_eq!(
            invalid.to_string(),
            "Invalid request for resource of type 'AWS::Amplify::App' with identifier 'd1': Name is required"
        );
    }

    #[test]
    fn test_service_error_display() {
        let fault = ServiceError::not_found("App d1 not found").with_request_id("req-7");
        assert_eq!(fault.to_string(), "NotFoundException: App d1 not found");
        assert_eq!(fault.request_id.as_deref(), Some("req-7"));
    }
}
