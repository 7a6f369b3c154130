//! # Amplify Service Client
//!
//! [`AmplifyApi`] is the seam between the handlers and the Amplify service: one async
//! method per remote call, each returning the service's response or a [`ServiceError`].
//! Handlers only ever hold a `&dyn AmplifyApi`, so the same handler code runs against:
//!
//! - [`emulator::EmulatorClient`] - an in-process actor that keeps real state
//! - [`mock::MockAmplify`] - scripted responses for step-by-step tests
//!
//! [`Operation`] names each call (for scripting and logging) and [`Reply`] carries any
//! response through a single channel type.

pub mod emulator;
pub mod mock;
pub mod types;

use async_trait::async_trait;
use handler_framework::ServiceError;
use std::collections::BTreeMap;
use types::{
    App, Branch, CreateAppRequest, CreateBranchRequest, CreateDomainAssociationRequest,
    DomainAssociation, Listing, UpdateAppRequest, UpdateBranchRequest,
    UpdateDomainAssociationRequest,
};

#[async_trait]
pub trait AmplifyApi: Send + Sync {
    async fn create_app(&self, request: CreateAppRequest) -> Result<App, ServiceError>;
    async fn get_app(&self, app_id: &str) -> Result<App, ServiceError>;
    async fn update_app(&self, app_id: &str, request: UpdateAppRequest)
        -> Result<App, ServiceError>;
    async fn delete_app(&self, app_id: &str) -> Result<(), ServiceError>;
    async fn list_apps(&self, next_token: Option<String>) -> Result<Listing<App>, ServiceError>;

    async fn create_branch(
        &self,
        app_id: &str,
        request: CreateBranchRequest,
    ) -> Result<Branch, ServiceError>;
    async fn get_branch(&self, app_id: &str, branch_name: &str) -> Result<Branch, ServiceError>;
    async fn update_branch(
        &self,
        app_id: &str,
        branch_name: &str,
        request: UpdateBranchRequest,
    ) -> Result<Branch, ServiceError>;
    async fn delete_branch(&self, app_id: &str, branch_name: &str) -> Result<(), ServiceError>;
    async fn list_branches(
        &self,
        app_id: &str,
        next_token: Option<String>,
    ) -> Result<Listing<Branch>, ServiceError>;

    async fn create_domain_association(
        &self,
        app_id: &str,
        request: CreateDomainAssociationRequest,
    ) -> Result<DomainAssociation, ServiceError>;
    async fn get_domain_association(
        &self,
        app_id: &str,
        domain_name: &str,
    ) -> Result<DomainAssociation, ServiceError>;
    async fn update_domain_association(
        &self,
        app_id: &str,
        domain_name: &str,
        request: UpdateDomainAssociationRequest,
    ) -> Result<DomainAssociation, ServiceError>;
    async fn delete_domain_association(
        &self,
        app_id: &str,
        domain_name: &str,
    ) -> Result<(), ServiceError>;
    async fn list_domain_associations(
        &self,
        app_id: &str,
        next_token: Option<String>,
    ) -> Result<Listing<DomainAssociation>, ServiceError>;

    async fn tag_resource(
        &self,
        resource_arn: &str,
        tags: BTreeMap<String, String>,
    ) -> Result<(), ServiceError>;
    async fn untag_resource(
        &self,
        resource_arn: &str,
        tag_keys: Vec<String>,
    ) -> Result<(), ServiceError>;
}

/// Every remote call, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
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
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::CreateApp => "CreateApp",
            Operation::GetApp => "GetApp",
            Operation::UpdateApp => "UpdateApp",
            Operation::DeleteApp => "DeleteApp",
            Operation::ListApps => "ListApps",
            Operation::CreateBranch => "CreateBranch",
            Operation::GetBranch => "GetBranch",
            Operation::UpdateBranch => "UpdateBranch",
            Operation::DeleteBranch => "DeleteBranch",
            Operation::ListBranches => "ListBranches",
            Operation::CreateDomainAssociation => "CreateDomainAssociation",
            Operation::GetDomainAssociation => "GetDomainAssociation",
            Operation::UpdateDomainAssociation => "UpdateDomainAssociation",
            Operation::DeleteDomainAssociation => "DeleteDomainAssociation",
            Operation::ListDomainAssociations => "ListDomainAssociations",
            Operation::TagResource => "TagResource",
            Operation::UntagResource => "UntagResource",
        }
    }
}

/// Any successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    App(App),
    Apps(Listing<App>),
    Branch(Branch),
    Branches(Listing<Branch>),
    Domain(DomainAssociation),
    Domains(Listing<DomainAssociation>),
    Empty,
}

fn mismatch(expected: &str, reply: &Reply) -> ServiceError {
    ServiceError::internal(format!("expected {expected} response, got {reply:?}"))
}

impl Reply {
    pub fn into_app(self) -> Result<App, ServiceError> {
        match self {
            Reply::App(app) => Ok(app),
            other => Err(mismatch("app", &other)),
        }
    }

    pub fn into_apps(self) -> Result<Listing<App>, ServiceError> {
        match self {
            Reply::Apps(apps) => Ok(apps),
            other => Err(mismatch("app listing", &other)),
        }
    }

    pub fn into_branch(self) -> Result<Branch, ServiceError> {
        match self {
            Reply::Branch(branch) => Ok(branch),
            other => Err(mismatch("branch", &other)),
        }
    }

    pub fn into_branches(self) -> Result<Listing<Branch>, ServiceError> {
        match self {
            Reply::Branches(branches) => Ok(branches),
            other => Err(mismatch("branch listing", &other)),
        }
    }

    pub fn into_domain(self) -> Result<DomainAssociation, ServiceError> {
        match self {
            Reply::Domain(domain) => Ok(domain),
            other => Err(mismatch("domain association", &other)),
        }
    }

    pub fn into_domains(self) -> Result<Listing<DomainAssociation>, ServiceError> {
        match self {
            Reply::Domains(domains) => Ok(domains),
            other => Err(mismatch("domain association listing", &other)),
        }
    }

    pub fn into_empty(self) -> Result<(), ServiceError> {
        match self {
            Reply::Empty => Ok(()),
            other => Err(mismatch("empty", &other)),
        }
    }
}
