//! # Reconciler
//!
//! The single entry point the invoking framework talks to:
//! `(OperationKind, request, CallbackContext) → ProgressEvent`.
//!
//! Dispatch is a plain `match` on [`OperationKind`]; each arm runs an independent
//! pipeline from [`crate::pipeline`]. The reconciler keeps no state between
//! invocations, so one instance can serve any number of concurrent operations.

use crate::error::HandlerError;
use crate::handler::ResourceHandler;
use crate::model::ResourceModel;
use crate::pipeline::{self, Context, Progress};
use crate::request::{HandlerRequestEnvelope, OperationKind, ResourceHandlerRequest};
use tracing::{debug, warn};

/// Identifier reported when the request could not be parsed far enough to name one.
const UNPARSED_IDENTIFIER: &str = "<unparsed>";

pub struct Reconciler<H: ResourceHandler> {
    handler: H,
}

impl<H: ResourceHandler> Reconciler<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Run one invocation of `kind`.
    ///
    /// `context` is the one returned by the previous `IN_PROGRESS` event of the same
    /// operation, or an empty context on the first invocation.
    pub async fn handle_request(
        &self,
        kind: OperationKind,
        client: &H::Client,
        request: ResourceHandlerRequest<H::Model>,
        context: Context<H>,
    ) -> Progress<H> {
        debug!(
            type_name = <H::Model as ResourceModel>::TYPE_NAME,
            operation = %kind,
            logical_id = request.logical_resource_identifier.as_deref().unwrap_or("-"),
            mutation_issued = context.mutation_issued,
            attempts = context.stabilization_attempts,
            "Handling request"
        );
        match kind {
            OperationKind::Create => {
                pipeline::create(&self.handler, client, request, context).await
            }
            OperationKind::Read => pipeline::read(&self.handler, client, request).await,
            OperationKind::Update => {
                pipeline::update(&self.handler, client, request, context).await
            }
            OperationKind::Delete => {
                pipeline::delete(&self.handler, client, request, context).await
            }
            OperationKind::List => pipeline::list(&self.handler, client, request).await,
        }
    }

    /// Run one invocation described by a JSON [`HandlerRequestEnvelope`] and return the
    /// JSON-encoded progress event.
    ///
    /// A malformed envelope yields a `FAILED` / `InvalidRequest` event rather than an
    /// error; only serializing the response can fail.
    pub async fn handle_envelope(
        &self,
        client: &H::Client,
        json: &str,
    ) -> Result<String, serde_json::Error> {
        let envelope: HandlerRequestEnvelope<
            H::Model,
            <H::Model as ResourceModel>::Identity,
        > = match serde_json::from_str(json) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    type_name = <H::Model as ResourceModel>::TYPE_NAME,
                    error = %e,
                    "Malformed request envelope"
                );
                let error = HandlerError::invalid_request(
                    <H::Model as ResourceModel>::TYPE_NAME,
                    UNPARSED_IDENTIFIER,
                    format!("Malformed request: {e}"),
                );
                return serde_json::to_string(&Progress::<H>::failed(&error));
            }
        };

        let context = envelope.callback_context.unwrap_or_default();
        let event = self
            .handle_request(envelope.action, client, envelope.request, context)
            .await;
        serde_json::to_string(&event)
    }
}
