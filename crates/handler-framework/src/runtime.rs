//! # Local Runtime Driver
//!
//! The pipelines never sleep; they hand back `IN_PROGRESS` and expect to be invoked
//! again later. In production that is the job of the hosting framework. `HandlerRuntime`
//! does the same thing in-process, for the demo binary and for tests:
//!
//! 1. invoke the reconciler;
//! 2. on `IN_PROGRESS`, push the callback context through JSON (nothing else survives
//!    between invocations), wait the requested delay and go again with the returned model;
//! 3. stop on the first terminal event, or after `max_invocations`.
//!
//! ```rust,ignore
//! let runtime = HandlerRuntime::new(RuntimeConfig::default());
//! let outcome = runtime
//!     .drive(&reconciler, &client, OperationKind::Create, request)
//!     .await;
//! assert_eq!(outcome.event.status(), OperationStatus::Success);
//! ```

use crate::error::HandlerError;
use crate::handler::ResourceHandler;
use crate::model::ResourceModel;
use crate::pipeline::Context;
use crate::progress::ProgressEvent;
use crate::reconciler::Reconciler;
use crate::request::{OperationKind, ResourceHandlerRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Upper bound on invocations for one operation.
    pub max_invocations: u32,
    /// Replaces the requested callback delay (e.g. zero in tests).
    #[serde(default)]
    pub delay_override: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_invocations: 100,
            delay_override: None,
        }
    }
}

/// Terminal event of a driven operation and how many invocations it took.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome<M, C> {
    pub event: ProgressEvent<M, C>,
    pub invocations: u32,
}

pub struct HandlerRuntime {
    config: RuntimeConfig,
}

impl HandlerRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Invoke `kind` until it reaches a terminal event.
    pub async fn drive<H: ResourceHandler>(
        &self,
        reconciler: &Reconciler<H>,
        client: &H::Client,
        kind: OperationKind,
        mut request: ResourceHandlerRequest<H::Model>,
    ) -> RunOutcome<H::Model, Context<H>> {
        let type_name = <H::Model as ResourceModel>::TYPE_NAME;
        let mut context = Context::<H>::default();
        let mut invocations = 0;

        loop {
            invocations += 1;
            let event = reconciler
                .handle_request(kind, client, request.clone(), context)
                .await;

            let (model, next_context, delay_seconds) = match event {
                ProgressEvent::InProgress {
                    resource_model,
                    callback_context,
                    callback_delay_seconds,
                } => (resource_model, callback_context, callback_delay_seconds),
                terminal => {
                    info!(
                        type_name,
                        operation = %kind,
                        invocations,
                        status = ?terminal.status(),
                        "Operation finished"
                    );
                    return RunOutcome {
                        event: terminal,
                        invocations,
                    };
                }
            };

            if invocations >= self.config.max_invocations {
                warn!(type_name, operation = %kind, invocations, "Giving up");
                let error = HandlerError::not_stabilized(
                    type_name,
                    model.primary_identifier(),
                    Some(format!("still in progress after {invocations} invocations")),
                );
                return RunOutcome {
                    event: ProgressEvent::failed(&error),
                    invocations,
                };
            }

            context = match persist::<H>(&model, &next_context) {
                Ok(restored) => restored,
                Err(error) => {
                    return RunOutcome {
                        event: ProgressEvent::failed(&error),
                        invocations,
                    }
                }
            };
            request.desired_resource_state = model;

            let delay = self
                .config
                .delay_override
                .unwrap_or(Duration::from_secs(delay_seconds));
            debug!(
                type_name,
                operation = %kind,
                invocations,
                delay_secs = delay.as_secs(),
                "Waiting before next invocation"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Round-trip a context through JSON, as a real suspension would.
fn persist<H: ResourceHandler>(
    model: &H::Model,
    context: &Context<H>,
) -> Result<Context<H>, HandlerError> {
    let internal = |e: serde_json::Error| HandlerError::InternalFailure {
        type_name: <H::Model as ResourceModel>::TYPE_NAME,
        identifier: model.primary_identifier(),
        message: format!("callback context could not be persisted: {e}"),
    };
    let json = serde_json::to_string(context).map_err(internal)?;
    serde_json::from_str(&json).map_err(internal)
}
