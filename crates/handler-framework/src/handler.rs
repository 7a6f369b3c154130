//! # ResourceHandler Trait
//!
//! The `ResourceHandler` trait is the contract every resource type (App, Branch, Domain
//! Association, …) implements to be driven by the generic [`Reconciler`](crate::Reconciler).
//! It lists the remote calls for each operation and the predicates that say when a
//! mutation has taken effect. The pipelines in [`crate::pipeline`] own the ordering,
//! the continuation state and the progress events, so a handler only describes *what*
//! to call.
//!
//! # Architecture Note
//! Every remote call goes through the [`ServiceProxy`] handed to each method. The proxy
//! classifies faults once, at the call, so a handler can use `?` freely and the error it
//! propagates already carries the right [`HandlerErrorCode`](crate::HandlerErrorCode).
//!
//! # Provided Methods (Hooks)
//! - [`ResourceHandler::existence_check`] / [`ResourceHandler::exists`]: defaults to no check.
//! - [`ResourceHandler::is_create_stabilized`] / [`ResourceHandler::is_update_stabilized`]:
//!   default to "immediately stable".
//! - [`ResourceHandler::is_delete_stabilized`]: defaults to reading the resource and treating
//!   `NotFound` as gone (see [`absence_as_stabilized`]).
//!
//! Stabilization predicates only run when the matching entry in
//! [`ResourceHandler::timings`] is configured.

use crate::backoff::ResourceTimings;
use crate::error::HandlerError;
use crate::executor::ServiceProxy;
use crate::model::ResourceModel;
use crate::poller::absence_as_stabilized;
use async_trait::async_trait;

/// Whether create looks the resource up before issuing the create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistenceCheck {
    /// Trust the service to reject duplicates (or generate fresh identities).
    #[default]
    Skip,
    /// Fail with `AlreadyExists` when [`ResourceHandler::exists`] says so.
    RejectExisting,
}

/// One page of a list operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<M> {
    pub items: Vec<M>,
    pub next_token: Option<String>,
}

impl<M> Page<M> {
    pub fn new(items: Vec<M>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }
}

#[async_trait]
pub trait ResourceHandler: Send + Sync + 'static {
    /// The resource shape this handler manages.
    type Model: ResourceModel;

    /// The remote service client. Usually a trait object such as `dyn AmplifyApi`.
    type Client: ?Sized + Send + Sync;

    /// Backoff strategies used to poll this resource type.
    fn timings(&self) -> &ResourceTimings;

    fn existence_check(&self) -> ExistenceCheck {
        ExistenceCheck::Skip
    }

    /// Whether the resource described by `model` already exists.
    /// Only consulted when [`ResourceHandler::existence_check`] asks for it.
    async fn exists(
        &self,
        _proxy: &ServiceProxy<'_, Self::Client>,
        _model: &Self::Model,
    ) -> Result<bool, HandlerError> {
        Ok(false)
    }

    /// Issue the create call and return the identity the service assigned.
    async fn create(
        &self,
        proxy: &ServiceProxy<'_, Self::Client>,
        model: &Self::Model,
    ) -> Result<<Self::Model as ResourceModel>::Identity, HandlerError>;

    /// Fetch the current state. Must fail with `NotFound` when the resource is absent.
    async fn read(
        &self,
        proxy: &ServiceProxy<'_, Self::Client>,
        model: &Self::Model,
    ) -> Result<Self::Model, HandlerError>;

    /// Issue the update call(s) that move `current` towards `desired`.
    async fn update(
        &self,
        proxy: &ServiceProxy<'_, Self::Client>,
        desired: &Self::Model,
        current: &Self::Model,
    ) -> Result<(), HandlerError>;

    async fn delete(
        &self,
        proxy: &ServiceProxy<'_, Self::Client>,
        model: &Self::Model,
    ) -> Result<(), HandlerError>;

    async fn list(
        &self,
        proxy: &ServiceProxy<'_, Self::Client>,
        model: &Self::Model,
        next_token: Option<&str>,
    ) -> Result<Page<Self::Model>, HandlerError>;

    /// Called once per invocation after create while `timings().create` is set.
    /// May refresh `model` with what the service reported.
    async fn is_create_stabilized(
        &self,
        _proxy: &ServiceProxy<'_, Self::Client>,
        _model: &mut Self::Model,
    ) -> Result<bool, HandlerError> {
        Ok(true)
    }

    /// Called once per invocation after update while `timings().update` is set.
    async fn is_update_stabilized(
        &self,
        _proxy: &ServiceProxy<'_, Self::Client>,
        _model: &mut Self::Model,
    ) -> Result<bool, HandlerError> {
        Ok(true)
    }

    /// Called once per invocation after delete.
    async fn is_delete_stabilized(
        &self,
        proxy: &ServiceProxy<'_, Self::Client>,
        model: &Self::Model,
    ) -> Result<bool, HandlerError> {
        let lookup = self.read(proxy, model).await;
        absence_as_stabilized(proxy.executor(), lookup)
    }
}
