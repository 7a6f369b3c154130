//! # Operation Pipelines
//!
//! One function per [`OperationKind`](crate::OperationKind). Each is a fixed, ordered
//! sequence of steps that short-circuits on the first error; the error is turned into
//! a `FAILED` event in exactly one place ([`finish`]).
//!
//! ## Create
//! 1. Reject read-only properties (`InvalidRequest`, before any remote call).
//! 2. Optional existence pre-check (`AlreadyExists`), per [`ExistenceCheck`].
//! 3. Create call; the returned identity goes onto the model and into the context.
//! 4. Stabilization, when `timings().create` is set.
//! 5. Read, for the canonical final model.
//!
//! Re-entry with an identity in the context restores it and jumps to step 4. The model
//! handed back in an `IN_PROGRESS` event already carries service-assigned fields, so
//! step 1 only applies to the first invocation.
//!
//! ## Update
//! Read current state (missing is fatal), update, stabilize when `timings().update` is
//! set, then read. Re-entry skips straight to stabilization.
//!
//! ## Delete
//! Delete call (a `NotFound` here is fatal), then poll until the resource is gone.
//! Succeeds without a model. Re-entry skips the delete call.
//!
//! ## Read / List
//! A single call each. An empty list is a success.

use crate::context::CallbackContext;
use crate::error::HandlerError;
use crate::executor::{Executor, ServiceProxy};
use crate::handler::{ExistenceCheck, ResourceHandler};
use crate::model::ResourceModel;
use crate::poller::{PollOutcome, Poller};
use crate::progress::ProgressEvent;
use crate::request::{OperationKind, ResourceHandlerRequest};
use tracing::{debug, info, instrument, warn};

/// Continuation state for handler `H`.
pub type Context<H> =
    CallbackContext<<<H as ResourceHandler>::Model as ResourceModel>::Identity>;

/// Progress event produced by handler `H`.
pub type Progress<H> = ProgressEvent<<H as ResourceHandler>::Model, Context<H>>;

#[instrument(skip_all, fields(type_name = <H::Model as ResourceModel>::TYPE_NAME))]
pub async fn create<H: ResourceHandler>(
    handler: &H,
    client: &H::Client,
    request: ResourceHandlerRequest<H::Model>,
    context: Context<H>,
) -> Progress<H> {
    finish::<H>(
        OperationKind::Create,
        create_steps(handler, client, request, context).await,
    )
}

#[instrument(skip_all, fields(type_name = <H::Model as ResourceModel>::TYPE_NAME))]
pub async fn read<H: ResourceHandler>(
    handler: &H,
    client: &H::Client,
    request: ResourceHandlerRequest<H::Model>,
) -> Progress<H> {
    let result = read_model(handler, client, &request.desired_resource_state)
        .await
        .map(ProgressEvent::success);
    finish::<H>(OperationKind::Read, result)
}

#[instrument(skip_all, fields(type_name = <H::Model as ResourceModel>::TYPE_NAME))]
pub async fn update<H: ResourceHandler>(
    handler: &H,
    client: &H::Client,
    request: ResourceHandlerRequest<H::Model>,
    context: Context<H>,
) -> Progress<H> {
    finish::<H>(
        OperationKind::Update,
        update_steps(handler, client, request, context).await,
    )
}

#[instrument(skip_all, fields(type_name = <H::Model as ResourceModel>::TYPE_NAME))]
pub async fn delete<H: ResourceHandler>(
    handler: &H,
    client: &H::Client,
    request: ResourceHandlerRequest<H::Model>,
    context: Context<H>,
) -> Progress<H> {
    finish::<H>(
        OperationKind::Delete,
        delete_steps(handler, client, request, context).await,
    )
}

#[instrument(skip_all, fields(type_name = <H::Model as ResourceModel>::TYPE_NAME))]
pub async fn list<H: ResourceHandler>(
    handler: &H,
    client: &H::Client,
    request: ResourceHandlerRequest<H::Model>,
) -> Progress<H> {
    let model = request.desired_resource_state;
    let proxy = ServiceProxy::new(client, Executor::for_model(&model));
    let result = handler
        .list(&proxy, &model, request.next_token.as_deref())
        .await
        .map(|page| {
            debug!(count = page.items.len(), "Listed resources");
            ProgressEvent::success_list(page.items, page.next_token)
        });
    finish::<H>(OperationKind::List, result)
}

async fn create_steps<H: ResourceHandler>(
    handler: &H,
    client: &H::Client,
    request: ResourceHandlerRequest<H::Model>,
    mut context: Context<H>,
) -> Result<Progress<H>, HandlerError> {
    let mut model = request.desired_resource_state;

    match context.identity.clone() {
        Some(identity) => {
            model.apply_identity(&identity);
            debug!(
                identifier = %model.primary_identifier(),
                attempts = context.stabilization_attempts,
                "Resuming create; skipping create call"
            );
        }
        None => {
            reject_read_only(&model)?;

            let proxy = ServiceProxy::new(client, Executor::for_model(&model));
            if handler.existence_check() == ExistenceCheck::RejectExisting
                && handler.exists(&proxy, &model).await?
            {
                return Err(HandlerError::AlreadyExists {
                    type_name: <H::Model as ResourceModel>::TYPE_NAME,
                    identifier: model.primary_identifier(),
                });
            }

            let identity = handler.create(&proxy, &model).await?;
            model.apply_identity(&identity);
            context.record_identity(identity);
            info!(identifier = %model.primary_identifier(), "Created resource");
        }
    }

    if let Some(strategy) = handler.timings().create {
        let proxy = ServiceProxy::new(client, Executor::for_model(&model));
        let outcome = Poller::new(strategy)
            .poll(
                proxy.executor(),
                &mut context,
                handler.is_create_stabilized(&proxy, &mut model),
            )
            .await?;
        if let PollOutcome::Pending { delay } = outcome {
            return Ok(ProgressEvent::in_progress(model, context, delay));
        }
    }

    let model = read_model(handler, client, &model).await?;
    Ok(ProgressEvent::success(model))
}

async fn update_steps<H: ResourceHandler>(
    handler: &H,
    client: &H::Client,
    request: ResourceHandlerRequest<H::Model>,
    mut context: Context<H>,
) -> Result<Progress<H>, HandlerError> {
    let mut model = request.desired_resource_state;
    let proxy = ServiceProxy::new(client, Executor::for_model(&model));

    if context.mutation_issued {
        debug!(
            identifier = proxy.executor().identifier(),
            attempts = context.stabilization_attempts,
            "Resuming update; skipping update call"
        );
    } else {
        let current = handler.read(&proxy, &model).await?;
        handler.update(&proxy, &model, &current).await?;
        context.record_mutation();
        info!(identifier = proxy.executor().identifier(), "Updated resource");
    }

    if let Some(strategy) = handler.timings().update {
        let outcome = Poller::new(strategy)
            .poll(
                proxy.executor(),
                &mut context,
                handler.is_update_stabilized(&proxy, &mut model),
            )
            .await?;
        if let PollOutcome::Pending { delay } = outcome {
            return Ok(ProgressEvent::in_progress(model, context, delay));
        }
    }

    let model = read_model(handler, client, &model).await?;
    Ok(ProgressEvent::success(model))
}

async fn delete_steps<H: ResourceHandler>(
    handler: &H,
    client: &H::Client,
    request: ResourceHandlerRequest<H::Model>,
    mut context: Context<H>,
) -> Result<Progress<H>, HandlerError> {
    let model = request.desired_resource_state;
    let proxy = ServiceProxy::new(client, Executor::for_model(&model));

    if context.mutation_issued {
        debug!(
            identifier = proxy.executor().identifier(),
            attempts = context.stabilization_attempts,
            "Resuming delete; skipping delete call"
        );
    } else {
        handler.delete(&proxy, &model).await?;
        context.record_mutation();
        info!(identifier = proxy.executor().identifier(), "Delete issued");
    }

    let outcome = Poller::new(handler.timings().delete)
        .poll(
            proxy.executor(),
            &mut context,
            handler.is_delete_stabilized(&proxy, &model),
        )
        .await?;
    match outcome {
        PollOutcome::Pending { delay } => Ok(ProgressEvent::in_progress(model, context, delay)),
        PollOutcome::Stabilized => Ok(ProgressEvent::no_content()),
    }
}

async fn read_model<H: ResourceHandler>(
    handler: &H,
    client: &H::Client,
    model: &H::Model,
) -> Result<H::Model, HandlerError> {
    let proxy = ServiceProxy::new(client, Executor::for_model(model));
    handler.read(&proxy, model).await
}

fn reject_read_only<M: ResourceModel>(model: &M) -> Result<(), HandlerError> {
    let present = model.read_only_properties();
    if present.is_empty() {
        return Ok(());
    }
    Err(HandlerError::invalid_request(
        M::TYPE_NAME,
        model.primary_identifier(),
        format!(
            "Create request includes read-only properties: {}",
            present.join(", ")
        ),
    ))
}

fn finish<H: ResourceHandler>(
    kind: OperationKind,
    result: Result<Progress<H>, HandlerError>,
) -> Progress<H> {
    match result {
        Ok(event) => {
            debug!(operation = %kind, status = ?event.status(), "Invocation finished");
            event
        }
        Err(error) => {
            warn!(
                operation = %kind,
                code = ?error.code(),
                retryable = error.is_retryable(),
                %error,
                "Operation failed"
            );
            ProgressEvent::failed(&error)
        }
    }
}
