//! # Handler Framework
//!
//! Building blocks for resource provider handlers: a **desired-state-to-remote-state
//! reconciler with stabilization polling**. A handler describes the remote calls for one
//! resource type; the framework orders them, classifies their faults, polls until the
//! remote side settles and reports progress to whoever invokes it.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into four layers:
//!
//! 1. **Resource Layer** ([`ResourceModel`], [`ResourceHandler`]) - Your resource shape and
//!    the remote calls that create, read, update, delete and list it
//! 2. **Execution Layer** ([`Executor`], [`ServiceProxy`]) - One remote call, one fault
//!    classification, one log line
//! 3. **Orchestration Layer** ([`pipeline`], [`Poller`], [`Reconciler`]) - Ordered steps per
//!    operation, stabilization decisions, `OperationKind` dispatch
//! 4. **Continuation Layer** ([`CallbackContext`], [`ProgressEvent`]) - The only state that
//!    crosses invocation boundaries, and the only results an invocation can produce
//!
//! ## Suspend / Resume
//!
//! The reconciler never sleeps. When a resource is not stable yet, an invocation returns
//! `IN_PROGRESS` with a delay and a [`CallbackContext`]; the invoking framework calls
//! again later with that context. Re-invoking with the same context and inputs gives
//! the same decision, and a create that already went through is never issued twice.
//!
//! ```text
//!  PENDING ──► IN_PROGRESS ──► … ──► SUCCESS
//!     │             │
//!     └─────────────┴──────────────► FAILED
//! ```
//!
//! [`HandlerRuntime`] is a small in-process invoker for demos and tests.
//!
//! ## Implementing a Handler
//!
//! ```rust,ignore
//! use handler_framework::{ResourceHandler, ResourceTimings, ServiceProxy, HandlerError, Page};
//! use async_trait::async_trait;
//!
//! struct WidgetHandler { timings: ResourceTimings }
//!
//! #[async_trait]
//! impl ResourceHandler for WidgetHandler {
//!     type Model = Widget;
//!     type Client = dyn WidgetApi;
//!
//!     fn timings(&self) -> &ResourceTimings { &self.timings }
//!
//!     async fn create(&self, proxy: &ServiceProxy<'_, dyn WidgetApi>, model: &Widget)
//!         -> Result<String, HandlerError>
//!     {
//!         let created = proxy.call("CreateWidget", proxy.client().create(model.name.clone())).await?;
//!         Ok(created.id)
//!     }
//!
//!     // read, update, delete, list ...
//! }
//!
//! let reconciler = Reconciler::new(WidgetHandler { timings });
//! let event = reconciler
//!     .handle_request(OperationKind::Create, &client, request, CallbackContext::new())
//!     .await;
//! ```
//!
//! ## Errors
//!
//! Faults are classified exactly once, where the remote call returns (see [`executor`]).
//! `NotFound` has two readings: fatal for read, update and the delete call itself, and the
//! success signal while waiting for a delete to finish ([`poller::absence_as_stabilized`]).
//! `Throttled` and `ServiceInternalError` are flagged retryable for the invoking framework;
//! the framework itself never retries a mutating call.
//!
//! ## Testing
//!
//! [`mock::ScriptedService`] scripts a service client call by call, so tests can assert
//! on step order and on exactly how many polls an operation took.

pub mod backoff;
pub mod context;
pub mod error;
pub mod executor;
pub mod handler;
pub mod mock;
pub mod model;
pub mod pipeline;
pub mod poller;
pub mod progress;
pub mod reconciler;
pub mod request;
pub mod runtime;
pub mod tracing;

// Re-export core types for convenience
pub use backoff::{Constant, ResourceTimings};
pub use context::CallbackContext;
pub use error::{HandlerError, HandlerErrorCode, ServiceError, ServiceErrorKind};
pub use executor::{Executor, ServiceProxy};
pub use handler::{ExistenceCheck, Page, ResourceHandler};
pub use model::ResourceModel;
pub use poller::{PollOutcome, Poller};
pub use progress::{OperationStatus, ProgressEvent};
pub use reconciler::Reconciler;
pub use request::{HandlerRequestEnvelope, OperationKind, ResourceHandlerRequest};
pub use runtime::{HandlerRuntime, RunOutcome, RuntimeConfig};
