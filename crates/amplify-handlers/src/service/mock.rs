//! # Mock Amplify Client & Testing Guide
//!
//! [`MockAmplify`] implements [`AmplifyApi`] on top of a
//! [`ScriptedService`](handler_framework::mock::ScriptedService): each test queues the
//! exact calls it expects, in order, with the [`Reply`] (or fault) each should get.
//! Any call out of order, or one too many, panics on the spot.
//!
//! ## When to use the Mock vs the Emulator
//!
//! | Feature | MockAmplify | AmplifyEmulator |
//! |---------|-------------|-----------------|
//! | **Speed** | Instant | Fast (spawns one task) |
//! | **State** | None (expectations) | Real apps, branches and domains |
//! | **Use Case** | Step order, poll counts, fault mapping | Full lifecycles |
//! | **Error Injection** | Any fault, any call | `fail_domains` only |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 1: Single Invocation (Step Order)</b></summary>
//!
//! Script the calls one invocation should make, run it through the
//! [`Reconciler`](handler_framework::Reconciler), then check the event and `verify()`.
//!
//! ```rust,ignore
//! let amplify = MockAmplify::new();
//! amplify
//!     .expect_get_domain_association()
//!     .return_err(ServiceError::not_found("absent"));
//! amplify.expect_create_domain_association().return_ok(Reply::Domain(creating));
//! amplify.expect_get_domain_association().return_ok(Reply::Domain(creating));
//!
//! let event = reconciler
//!     .handle_request(OperationKind::Create, &amplify, request, CallbackContext::default())
//!     .await;
//!
//! assert_eq!(event.status(), OperationStatus::InProgress);
//! amplify.verify();
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Re-entry</b></summary>
//!
//! Feed the model and callback context of an `IN_PROGRESS` event back in and script only
//! what the resumed invocation should do. Scripting no create call proves it is not
//! issued twice.
//! </details>
//!
//! <details>
//! <summary><b>Pattern 3: Fault Mapping</b></summary>
//!
//! `return_err` with any [`ServiceErrorKind`](handler_framework::ServiceErrorKind) and
//! assert on the `FAILED` event's error code.
//! </details>

use super::types::{
    App, Branch, CreateAppRequest, CreateBranchRequest, CreateDomainAssociationRequest,
    DomainAssociation, Listing, UpdateAppRequest, UpdateBranchRequest,
    UpdateDomainAssociationRequest,
};
use super::{AmplifyApi, Operation, Reply};
use async_trait::async_trait;
use handler_framework::mock::{ExpectationBuilder, ScriptedService};
use handler_framework::ServiceError;
use std::collections::BTreeMap;

#[derive(Clone, Default)]
pub struct MockAmplify {
    script: ScriptedService<Operation, Reply>,
}

impl MockAmplify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.script.calls()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.script.call_count(operation)
    }

    /// Panics unless every queued expectation was consumed.
    pub fn verify(&self) {
        self.script.verify();
    }
}

macro_rules! expectations {
    ($($op:ident),* $(,)?) => {
        paste::paste! {
            impl MockAmplify {
                $(
                    #[doc = concat!("Queue the next expected `", stringify!($op), "` call.")]
                    pub fn [<expect_ $op:snake>](&self) -> ExpectationBuilder<Operation, Reply> {
                        self.script.expect(Operation::$op)
                    }
                )*
            }
        }
    };
}

expectations!(
    CreateApp,
    GetApp,
    UpdateApp,
    DeleteApp,
    ListApps,
    CreateBranch,
    GetBranch,
    UpdateBranch,
    DeleteBranch,
    ListBranches,
    CreateDomainAssociation,
    GetDomainAssociation,
    UpdateDomainAssociation,
    DeleteDomainAssociation,
    ListDomainAssociations,
    TagResource,
    UntagResource,
);

#[async_trait]
impl AmplifyApi for MockAmplify {
    async fn create_app(&self, _request: CreateAppRequest) -> Result<App, ServiceError> {
        self.script.next(Operation::CreateApp)?.into_app()
    }

    async fn get_app(&self, _app_id: &str) -> Result<App, ServiceError> {
        self.script.next(Operation::GetApp)?.into_app()
    }

    async fn update_app(&self, _app_id: &str, _request: UpdateAppRequest) -> Result<App, ServiceError> {
        self.script.next(Operation::UpdateApp)?.into_app()
    }

    async fn delete_app(&self, _app_id: &str) -> Result<(), ServiceError> {
        self.script.next(Operation::DeleteApp)?.into_empty()
    }

    async fn list_apps(&self, _next_token: Option<String>) -> Result<Listing<App>, ServiceError> {
        self.script.next(Operation::ListApps)?.into_apps()
    }

    async fn create_branch(
        &self,
        _app_id: &str,
        _request: CreateBranchRequest,
    ) -> Result<Branch, ServiceError> {
        self.script.next(Operation::CreateBranch)?.into_branch()
    }

    async fn get_branch(&self, _app_id: &str, _branch_name: &str) -> Result<Branch, ServiceError> {
        self.script.next(Operation::GetBranch)?.into_branch()
    }

    async fn update_branch(
        &self,
        _app_id: &str,
        _branch_name: &str,
        _request: UpdateBranchRequest,
    ) -> Result<Branch, ServiceError> {
        self.script.next(Operation::UpdateBranch)?.into_branch()
    }

    async fn delete_branch(&self, _app_id: &str, _branch_name: &str) -> Result<(), ServiceError> {
        self.script.next(Operation::DeleteBranch)?.into_empty()
    }

    async fn list_branches(
        &self,
        _app_id: &str,
        _next_token: Option<String>,
    ) -> Result<Listing<Branch>, ServiceError> {
        self.script.next(Operation::ListBranches)?.into_branches()
    }

    async fn create_domain_association(
        &self,
        _app_id: &str,
        _request: CreateDomainAssociationRequest,
    ) -> Result<DomainAssociation, ServiceError> {
        self.script
            .next(Operation::CreateDomainAssociation)?
            .into_domain()
    }

    async fn get_domain_association(
        &self,
        _app_id: &str,
        _domain_name: &str,
    ) -> Result<DomainAssociation, ServiceError> {
        self.script.next(Operation::GetDomainAssociation)?.into_domain()
    }

    async fn update_domain_association(
        &self,
        _app_id: &str,
        _domain_name: &str,
        _request: UpdateDomainAssociationRequest,
    ) -> Result<DomainAssociation, ServiceError> {
        self.script
            .next(Operation::UpdateDomainAssociation)?
            .into_domain()
    }

    async fn delete_domain_association(
        &self,
        _app_id: &str,
        _domain_name: &str,
    ) -> Result<(), ServiceError> {
        self.script
            .next(Operation::DeleteDomainAssociation)?
            .into_empty()
    }

    async fn list_domain_associations(
        &self,
        _app_id: &str,
        _next_token: Option<String>,
    ) -> Result<Listing<DomainAssociation>, ServiceError> {
        self.script
            .next(Operation::ListDomainAssociations)?
            .into_domains()
    }

    async fn tag_resource(
        &self,
        _resource_arn: &str,
        _tags: BTreeMap<String, String>,
    ) -> Result<(), ServiceError> {
        self.script.next(Operation::TagResource)?.into_empty()
    }

    async fn untag_resource(
        &self,
        _resource_arn: &str,
        _tag_keys: Vec<String>,
    ) -> Result<(), ServiceError> {
        self.script.next(Operation::UntagResource)?.into_empty()
    }
}
