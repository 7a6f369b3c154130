//! # Operation Executor
//!
//! Wraps a single remote call: the call runs exactly once, a successful response passes
//! through untouched and a fault is classified into the [`HandlerError`] taxonomy.
//! Nothing is retried here; transient faults surface as retryable codes and it is up
//! to the invoking framework to re-invoke.
//!
//! Handlers reach the remote client through a [`ServiceProxy`], which pairs the client
//! with the executor for the resource being worked on:
//!
//! ```rust,ignore
//! let app = proxy
//!     .call("GetApp", proxy.client().get_app(app_id))
//!     .await?;
//! ```

use crate::error::{HandlerError, ServiceError, ServiceErrorKind};
use crate::model::ResourceModel;
use std::future::Future;
use tracing::{debug, warn};

/// Executes and classifies remote calls on behalf of one resource.
#[derive(Debug, Clone)]
pub struct Executor {
    type_name: &'static str,
    identifier: String,
}

impl Executor {
    pub fn new(type_name: &'static str, identifier: impl Into<String>) -> Self {
        Self {
            type_name,
            identifier: identifier.into(),
        }
    }

    pub fn for_model<M: ResourceModel>(model: &M) -> Self {
        Self::new(M::TYPE_NAME, model.primary_identifier())
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Invoke `call` once and classify its fault, if any.
    pub async fn execute<T, F>(&self, operation: &'static str, call: F) -> Result<T, HandlerError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        debug!(
            type_name = self.type_name,
            identifier = %self.identifier,
            operation,
            "Invoking service call"
        );
        match call.await {
            Ok(response) => Ok(response),
            Err(fault) => {
                warn!(
                    type_name = self.type_name,
                    identifier = %self.identifier,
                    operation,
                    fault = %fault.kind,
                    request_id = fault.request_id.as_deref().unwrap_or("-"),
                    message = %fault.message,
                    "Service call failed"
                );
                Err(self.classify(operation, fault))
            }
        }
    }

    /// Map a service fault onto the handler taxonomy.
    pub fn classify(&self, operation: &str, fault: ServiceError) -> HandlerError {
        let type_name = self.type_name;
        let identifier = self.identifier.clone();
        let operation = operation.to_string();
        let message = fault.message;
        match fault.kind {
            ServiceErrorKind::NotFound => HandlerError::NotFound {
                type_name,
                identifier,
            },
            ServiceErrorKind::BadRequest => HandlerError::InvalidRequest {
                type_name,
                identifier,
                message,
            },
            ServiceErrorKind::LimitExceeded => HandlerError::ServiceLimitExceeded {
                type_name,
                identifier,
                message,
            },
            ServiceErrorKind::Unauthorized => HandlerError::AccessDenied {
                type_name,
                identifier,
                operation,
                message,
            },
            ServiceErrorKind::Throttling => HandlerError::Throttled {
                type_name,
                identifier,
                operation,
                message,
            },
            ServiceErrorKind::InternalFailure => HandlerError::ServiceInternalError {
                type_name,
                identifier,
                operation,
                message,
            },
            ServiceErrorKind::DependentService | ServiceErrorKind::Other => {
                HandlerError::GeneralServiceError {
                    type_name,
                    identifier,
                    operation,
                    message,
                }
            }
        }
    }
}

/// A remote client paired with the executor for the resource at hand.
pub struct ServiceProxy<'a, C: ?Sized> {
    client: &'a C,
    executor: Executor,
}

impl<'a, C: ?Sized> ServiceProxy<'a, C> {
    pub fn new(client: &'a C, executor: Executor) -> Self {
        Self { client, executor }
    }

    pub fn client(&self) -> &'a C {
        self.client
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Run one remote call through the executor.
    pub async fn call<T, F>(&self, operation: &'static str, call: F) -> Result<T, HandlerError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        self.executor.execute(operation, call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerErrorCode;

    fn executor() -> Executor {
        Executor::new("AWS::Amplify::Branch", "d1/main")
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let result = executor()
            .execute("GetBranch", async { Ok::<_, ServiceError>(42) })
            .await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_faults_are_classified() {
        let cases = [
            (ServiceErrorKind::NotFound, HandlerErrorCode::NotFound),
            (ServiceErrorKind::BadRequest, HandlerErrorCode::InvalidRequest),
            (ServiceErrorKind::LimitExceeded, HandlerErrorCode::ServiceLimitExceeded),
            (ServiceErrorKind::Unauthorized, HandlerErrorCode::AccessDenied),
            (ServiceErrorKind::Throttling, HandlerErrorCode::Throttled),
            (ServiceErrorKind::InternalFailure, HandlerErrorCode::ServiceInternalError),
            (ServiceErrorKind::DependentService, HandlerErrorCode::GeneralServiceError),
            (ServiceErrorKind::Other, HandlerErrorCode::GeneralServiceError),
        ];

        for (kind, expected) in cases {
            let result: Result<(), _> = executor()
                .execute("GetBranch", async move { Err(ServiceError::new(kind, "fault")) })
                .await;
            assert_eq!(result.unwrap_err().code(), expected, "kind {kind}");
        }
    }

    #[test]
    fn test_every_classified_fault_names_type_and_identifier() {
        let executor = Executor::new(
            "AWS::Amplify::Branch",
            "arn:aws:amplify:us-east-1:123456789012:apps/d1/branches/main",
        );
        let kinds = [
            ServiceErrorKind::NotFound,
            ServiceErrorKind::BadRequest,
            ServiceErrorKind::LimitExceeded,
            ServiceErrorKind::Unauthorized,
            ServiceErrorKind::Throttling,
            ServiceErrorKind::InternalFailure,
            ServiceErrorKind::DependentService,
            ServiceErrorKind::Other,
        ];

        for kind in kinds {
            let message = executor
                .classify("CreateBranch", ServiceError::new(kind, "boom"))
                .to_string();
            assert!(message.contains("AWS::Amplify::Branch"), "{kind}: {message}");
            assert!(message.contains("apps/d1/branches/main"), "{kind}: {message}");
        }
    }

    #[tokio::test]
    async fn test_not_found_names_the_resource() {
        let result: Result<(), _> = executor()
            .execute("GetBranch", async { Err(ServiceError::not_found("no branch")) })
            .await;
        assert_eq!(
            result.unwrap_err(),
            HandlerError::not_found("AWS::Amplify::Branch", "d1/main")
        );
    }
}
