//! # Amplify Emulator
//!
//! An in-process stand-in for the Amplify service, built as an actor: the
//! [`AmplifyEmulator`] owns all state and processes [`EmulatorRequest`]s one at a time,
//! while any number of cloned [`EmulatorClient`]s talk to it over a channel. Because
//! the state lives inside one task, no locking is needed.
//!
//! ## Behaviour
//!
//! - Apps get generated ids (`d` followed by 13 hex digits) and a `<id>.amplifyapp.com`
//!   default domain. Deleting an app removes its branches and domain associations.
//! - Branch and domain names must be unique within an app; a duplicate is a
//!   `BadRequestException`, a missing resource a `NotFoundException`.
//! - Domain associations start in `CREATING`. Every `GetDomainAssociation` advances
//!   provisioning: [`EmulatorConfig::domain_provisioning_polls`] reads report
//!   `REQUESTING_CERTIFICATE`, the next one `AVAILABLE`. Updates go through `UPDATING`
//!   the same way. Domains listed in [`EmulatorConfig::fail_domains`] end in `FAILED`.
//! - List calls page through results with an opaque index token.
//! - Every fault carries a request id, like the real service.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (emulator, client) = AmplifyEmulator::new(32, EmulatorConfig::default());
//! let handle = tokio::spawn(emulator.run());
//!
//! let app = client.create_app(request).await?;
//!
//! drop(client);
//! handle.await?;
//! ```

use super::types::{
    App, Branch, CreateAppRequest, CreateBranchRequest, CreateDomainAssociationRequest,
    DomainAssociation, DomainStatus, Listing, SubDomain, UpdateAppRequest, UpdateBranchRequest,
    UpdateDomainAssociationRequest,
};
use super::{AmplifyApi, Operation, Reply};
use crate::model::arn::{self, ResourcePath};
use async_trait::async_trait;
use handler_framework::ServiceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

const REGION: &str = "us-east-1";
const ACCOUNT: &str = "123456789012";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmulatorConfig {
    /// Reads a new or updated domain association spends provisioning.
    pub domain_provisioning_polls: u32,
    /// Domain names whose provisioning fails.
    pub fail_domains: Vec<String>,
    pub page_size: usize,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            domain_provisioning_polls: 2,
            fail_domains: Vec::new(),
            page_size: 50,
        }
    }
}

/// One remote call and its payload.
#[derive(Debug)]
pub enum ApiCall {
    CreateApp(CreateAppRequest),
    GetApp { app_id: String },
    UpdateApp { app_id: String, request: UpdateAppRequest },
    DeleteApp { app_id: String },
    ListApps { next_token: Option<String> },
    CreateBranch { app_id: String, request: CreateBranchRequest },
    GetBranch { app_id: String, branch_name: String },
    UpdateBranch {
        app_id: String,
        branch_name: String,
        request: UpdateBranchRequest,
    },
    DeleteBranch { app_id: String, branch_name: String },
    ListBranches { app_id: String, next_token: Option<String> },
    CreateDomain {
        app_id: String,
        request: CreateDomainAssociationRequest,
    },
    GetDomain { app_id: String, domain_name: String },
    UpdateDomain {
        app_id: String,
        domain_name: String,
        request: UpdateDomainAssociationRequest,
    },
    DeleteDomain { app_id: String, domain_name: String },
    ListDomains { app_id: String, next_token: Option<String> },
    TagResource {
        resource_arn: String,
        tags: BTreeMap<String, String>,
    },
    UntagResource {
        resource_arn: String,
        tag_keys: Vec<String>,
    },
}

impl ApiCall {
    pub fn operation(&self) -> Operation {
        match self {
            ApiCall::CreateApp(_) => Operation::CreateApp,
            ApiCall::GetApp { .. } => Operation::GetApp,
            ApiCall::UpdateApp { .. } => Operation::UpdateApp,
            ApiCall::DeleteApp { .. } => Operation::DeleteApp,
            ApiCall::ListApps { .. } => Operation::ListApps,
            ApiCall::CreateBranch { .. } => Operation::CreateBranch,
            ApiCall::GetBranch { .. } => Operation::GetBranch,
            ApiCall::UpdateBranch { .. } => Operation::UpdateBranch,
            ApiCall::DeleteBranch { .. } => Operation::DeleteBranch,
            ApiCall::ListBranches { .. } => Operation::ListBranches,
            ApiCall::CreateDomain { .. } => Operation::CreateDomainAssociation,
            ApiCall::GetDomain { .. } => Operation::GetDomainAssociation,
            ApiCall::UpdateDomain { .. } => Operation::UpdateDomainAssociation,
            ApiCall::DeleteDomain { .. } => Operation::DeleteDomainAssociation,
            ApiCall::ListDomains { .. } => Operation::ListDomainAssociations,
            ApiCall::TagResource { .. } => Operation::TagResource,
            ApiCall::UntagResource { .. } => Operation::UntagResource,
        }
    }
}

#[derive(Debug)]
pub struct EmulatorRequest {
    pub call: ApiCall,
    pub respond_to: oneshot::Sender<Result<Reply, ServiceError>>,
}

struct DomainRecord {
    association: DomainAssociation,
    remaining_reads: u32,
}

struct AppRecord {
    app: App,
    branches: BTreeMap<String, Branch>,
    domains: BTreeMap<String, DomainRecord>,
}

pub struct AmplifyEmulator {
    receiver: mpsc::Receiver<EmulatorRequest>,
    config: EmulatorConfig,
    apps: BTreeMap<String, AppRecord>,
    next_app: u64,
    next_request: u64,
}

impl AmplifyEmulator {
    /// Create the emulator (server) and a client connected to it.
    /// `buffer` is the channel capacity; callers wait when it is full.
    pub fn new(buffer: usize, config: EmulatorConfig) -> (Self, EmulatorClient) {
        let (sender, receiver) = mpsc::channel(buffer);
        let emulator = Self {
            receiver,
            config,
            apps: BTreeMap::new(),
            next_app: 1,
            next_request: 1,
        };
        (emulator, EmulatorClient { sender })
    }

    /// Serve requests until every client has been dropped.
    pub async fn run(mut self) {
        info!("Amplify emulator started");

        while let Some(EmulatorRequest { call, respond_to }) = self.receiver.recv().await {
            let operation = call.operation().as_str();
            let result = self.dispatch(call);
            match &result {
                Ok(_) => debug!(operation, "Served"),
                Err(fault) => warn!(
                    operation,
                    fault = %fault.kind,
                    request_id = fault.request_id.as_deref().unwrap_or("-"),
                    "Rejected"
                ),
            }
            let _ = respond_to.send(result);
        }

        info!(apps = self.apps.len(), "Amplify emulator shutdown");
    }

    fn dispatch(&mut self, call: ApiCall) -> Result<Reply, ServiceError> {
        let result = match call {
            ApiCall::CreateApp(request) => Ok(Reply::App(self.create_app(request))),
            ApiCall::GetApp { app_id } => self.app(&app_id).map(|r| Reply::App(r.app.clone())),
            ApiCall::UpdateApp { app_id, request } => self.update_app(&app_id, request),
            ApiCall::DeleteApp { app_id } => self.delete_app(&app_id),
            ApiCall::ListApps { next_token } => {
                let apps: Vec<App> = self.apps.values().map(|r| r.app.clone()).collect();
                self.page(apps, next_token).map(Reply::Apps)
            }
            ApiCall::CreateBranch { app_id, request } => self.create_branch(&app_id, request),
            ApiCall::GetBranch {
                app_id,
                branch_name,
            } => self.branch(&app_id, &branch_name).map(|b| Reply::Branch(b.clone())),
            ApiCall::UpdateBranch {
                app_id,
                branch_name,
                request,
            } => self.update_branch(&app_id, &branch_name, request),
            ApiCall::DeleteBranch {
                app_id,
                branch_name,
            } => self.delete_branch(&app_id, &branch_name),
            ApiCall::ListBranches { app_id, next_token } => {
                self.list_branches(&app_id, next_token)
            }
            ApiCall::CreateDomain { app_id, request } => self.create_domain(&app_id, request),
            ApiCall::GetDomain {
                app_id,
                domain_name,
            } => self.get_domain(&app_id, &domain_name),
            ApiCall::UpdateDomain {
                app_id,
                domain_name,
                request,
            } => self.update_domain(&app_id, &domain_name, request),
            ApiCall::DeleteDomain {
                app_id,
                domain_name,
            } => self.delete_domain(&app_id, &domain_name),
            ApiCall::ListDomains { app_id, next_token } => {
                self.list_domains(&app_id, next_token)
            }
            ApiCall::TagResource { resource_arn, tags } => self
                .tags_of(&resource_arn)
                .map(|target| {
                    target.extend(tags);
                    Reply::Empty
                }),
            ApiCall::UntagResource {
                resource_arn,
                tag_keys,
            } => self.tags_of(&resource_arn).map(|target| {
                for key in &tag_keys {
                    target.remove(key);
                }
                Reply::Empty
            }),
        };
        result.map_err(|fault| {
            let request_id = format!("req-{:06}", self.next_request);
            self.next_request += 1;
            fault.with_request_id(request_id)
        })
    }

    fn create_app(&mut self, request: CreateAppRequest) -> App {
        let app_id = format!("d{:013x}", self.next_app);
        self.next_app += 1;
        let app = App {
            app_arn: arn::format(REGION, ACCOUNT, &ResourcePath::App {
                app_id: app_id.clone(),
            }),
            default_domain: format!("{app_id}.amplifyapp.com"),
            app_id: app_id.clone(),
            name: request.name,
            description: request.description,
            repository: request.repository,
            platform: request.platform.unwrap_or_else(|| "WEB".to_string()),
            iam_service_role_arn: request.iam_service_role_arn,
            enable_branch_auto_build: request.enable_branch_auto_build.unwrap_or(false),
            environment_variables: request.environment_variables,
            tags: request.tags,
        };
        info!(%app_id, name = %app.name, "App created");
        self.apps.insert(
            app_id,
            AppRecord {
                app: app.clone(),
                branches: BTreeMap::new(),
                domains: BTreeMap::new(),
            },
        );
        app
    }

    fn update_app(&mut self, app_id: &str, request: UpdateAppRequest) -> Result<Reply, ServiceError> {
        let app = &mut self.app_mut(app_id)?.app;
        if let Some(name) = request.name {
            app.name = name;
        }
        if let Some(platform) = request.platform {
            app.platform = platform;
        }
        if let Some(enabled) = request.enable_branch_auto_build {
            app.enable_branch_auto_build = enabled;
        }
        app.description = request.description;
        app.iam_service_role_arn = request.iam_service_role_arn;
        app.environment_variables = request.environment_variables;
        Ok(Reply::App(app.clone()))
    }

    fn delete_app(&mut self, app_id: &str) -> Result<Reply, ServiceError> {
        let record = self
            .apps
            .remove(app_id)
            .ok_or_else(|| ServiceError::not_found(format!("App {app_id} not found.")))?;
        info!(
            app_id,
            branches = record.branches.len(),
            domains = record.domains.len(),
            "App deleted"
        );
        Ok(Reply::Empty)
    }

    fn create_branch(
        &mut self,
        app_id: &str,
        request: CreateBranchRequest,
    ) -> Result<Reply, ServiceError> {
        let record = self.app_mut(app_id)?;
        if record.branches.contains_key(&request.branch_name) {
            return Err(ServiceError::bad_request(format!(
                "Branch {} already exists for app {app_id}.",
                request.branch_name
            )));
        }
        let branch = Branch {
            branch_arn: arn::format(REGION, ACCOUNT, &ResourcePath::Branch {
                app_id: app_id.to_string(),
                branch_name: request.branch_name.clone(),
            }),
            branch_name: request.branch_name.clone(),
            description: request.description,
            stage: request.stage,
            framework: request.framework,
            enable_auto_build: request.enable_auto_build.unwrap_or(true),
            enable_pull_request_preview: request.enable_pull_request_preview.unwrap_or(false),
            environment_variables: request.environment_variables,
            tags: request.tags,
        };
        info!(app_id, branch = %branch.branch_name, "Branch created");
        record
            .branches
            .insert(request.branch_name, branch.clone());
        Ok(Reply::Branch(branch))
    }

    fn update_branch(
        &mut self,
        app_id: &str,
        branch_name: &str,
        request: UpdateBranchRequest,
    ) -> Result<Reply, ServiceError> {
        let branch = self.branch_mut(app_id, branch_name)?;
        if let Some(enabled) = request.enable_auto_build {
            branch.enable_auto_build = enabled;
        }
        if let Some(enabled) = request.enable_pull_request_preview {
            branch.enable_pull_request_preview = enabled;
        }
        branch.description = request.description;
        branch.stage = request.stage;
        branch.framework = request.framework;
        branch.environment_variables = request.environment_variables;
        Ok(Reply::Branch(branch.clone()))
    }

    fn delete_branch(&mut self, app_id: &str, branch_name: &str) -> Result<Reply, ServiceError> {
        self.app_mut(app_id)?
            .branches
            .remove(branch_name)
            .ok_or_else(|| branch_missing(app_id, branch_name))?;
        info!(app_id, branch = branch_name, "Branch deleted");
        Ok(Reply::Empty)
    }

    fn list_branches(&self, app_id: &str, next_token: Option<String>) -> Result<Reply, ServiceError> {
        let branches: Vec<Branch> = self.app(app_id)?.branches.values().cloned().collect();
        self.page(branches, next_token).map(Reply::Branches)
    }

    fn create_domain(
        &mut self,
        app_id: &str,
        request: CreateDomainAssociationRequest,
    ) -> Result<Reply, ServiceError> {
        let remaining_reads = self.config.domain_provisioning_polls;
        let record = self.app_mut(app_id)?;
        if record.domains.contains_key(&request.domain_name) {
            return Err(ServiceError::bad_request(format!(
                "Domain {} is already associated with app {app_id}.",
                request.domain_name
            )));
        }
        for setting in &request.sub_domain_settings {
            if !record.branches.contains_key(&setting.branch_name) {
                return Err(ServiceError::bad_request(format!(
                    "Branch {} referenced by sub domain {} does not exist.",
                    setting.branch_name, setting.prefix
                )));
            }
        }

        let domain_name = request.domain_name;
        let association = DomainAssociation {
            domain_association_arn: arn::format(REGION, ACCOUNT, &ResourcePath::Domain {
                app_id: app_id.to_string(),
                domain_name: domain_name.clone(),
            }),
            domain_name: domain_name.clone(),
            enable_auto_sub_domain: request.enable_auto_sub_domain.unwrap_or(false),
            domain_status: DomainStatus::Creating,
            status_reason: None,
            certificate_verification_dns_record: None,
            sub_domains: sub_domains(&domain_name, request.sub_domain_settings),
        };
        info!(app_id, domain = %domain_name, "Domain association created");
        record.domains.insert(
            domain_name,
            DomainRecord {
                association: association.clone(),
                remaining_reads,
            },
        );
        Ok(Reply::Domain(association))
    }

    fn get_domain(&mut self, app_id: &str, domain_name: &str) -> Result<Reply, ServiceError> {
        let fails = self.config.fail_domains.iter().any(|d| d == domain_name);
        let record = self.domain_mut(app_id, domain_name)?;
        advance(record, fails);
        debug!(
            app_id,
            domain = domain_name,
            status = %record.association.domain_status,
            "Domain association read"
        );
        Ok(Reply::Domain(record.association.clone()))
    }

    fn update_domain(
        &mut self,
        app_id: &str,
        domain_name: &str,
        request: UpdateDomainAssociationRequest,
    ) -> Result<Reply, ServiceError> {
        let remaining_reads = self.config.domain_provisioning_polls;
        let record = self.domain_mut(app_id, domain_name)?;
        if let Some(enabled) = request.enable_auto_sub_domain {
            record.association.enable_auto_sub_domain = enabled;
        }
        record.association.sub_domains = sub_domains(domain_name, request.sub_domain_settings);
        record.association.domain_status = DomainStatus::Updating;
        record.association.status_reason = None;
        record.remaining_reads = remaining_reads;
        Ok(Reply::Domain(record.association.clone()))
    }

    fn delete_domain(&mut self, app_id: &str, domain_name: &str) -> Result<Reply, ServiceError> {
        self.app_mut(app_id)?
            .domains
            .remove(domain_name)
            .ok_or_else(|| domain_missing(app_id, domain_name))?;
        info!(app_id, domain = domain_name, "Domain association deleted");
        Ok(Reply::Empty)
    }

    fn list_domains(&self, app_id: &str, next_token: Option<String>) -> Result<Reply, ServiceError> {
        let domains: Vec<DomainAssociation> = self
            .app(app_id)?
            .domains
            .values()
            .map(|record| record.association.clone())
            .collect();
        self.page(domains, next_token).map(Reply::Domains)
    }

    fn tags_of(&mut self, resource_arn: &str) -> Result<&mut BTreeMap<String, String>, ServiceError> {
        match arn::parse(resource_arn) {
            Some(ResourcePath::App { app_id }) => Ok(&mut self.app_mut(&app_id)?.app.tags),
            Some(ResourcePath::Branch {
                app_id,
                branch_name,
            }) => Ok(&mut self.branch_mut(&app_id, &branch_name)?.tags),
            Some(ResourcePath::Domain { .. }) => Err(ServiceError::bad_request(
                "Domain associations do not support tags.",
            )),
            None => Err(ServiceError::bad_request(format!(
                "Invalid resource ARN {resource_arn}."
            ))),
        }
    }

    fn page<T>(&self, items: Vec<T>, next_token: Option<String>) -> Result<Listing<T>, ServiceError> {
        let start = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ServiceError::bad_request(format!("Invalid next token {token}.")))?,
            None => 0,
        };
        let page_size = self.config.page_size.max(1);
        let end = start.saturating_add(page_size).min(items.len());
        let next_token = (end < items.len()).then(|| end.to_string());
        let items = items.into_iter().skip(start).take(end.saturating_sub(start)).collect();
        Ok(Listing { items, next_token })
    }

    fn app(&self, app_id: &str) -> Result<&AppRecord, ServiceError> {
        self.apps
            .get(app_id)
            .ok_or_else(|| ServiceError::not_found(format!("App {app_id} not found.")))
    }

    fn app_mut(&mut self, app_id: &str) -> Result<&mut AppRecord, ServiceError> {
        self.apps
            .get_mut(app_id)
            .ok_or_else(|| ServiceError::not_found(format!("App {app_id} not found.")))
    }

    fn branch(&self, app_id: &str, branch_name: &str) -> Result<&Branch, ServiceError> {
        self.app(app_id)?
            .branches
            .get(branch_name)
            .ok_or_else(|| branch_missing(app_id, branch_name))
    }

    fn branch_mut(&mut self, app_id: &str, branch_name: &str) -> Result<&mut Branch, ServiceError> {
        self.app_mut(app_id)?
            .branches
            .get_mut(branch_name)
            .ok_or_else(|| branch_missing(app_id, branch_name))
    }

    fn domain_mut(&mut self, app_id: &str, domain_name: &str) -> Result<&mut DomainRecord, ServiceError> {
        self.app_mut(app_id)?
            .domains
            .get_mut(domain_name)
            .ok_or_else(|| domain_missing(app_id, domain_name))
    }
}

fn branch_missing(app_id: &str, branch_name: &str) -> ServiceError {
    ServiceError::not_found(format!("Branch {branch_name} not found for app {app_id}."))
}

fn domain_missing(app_id: &str, domain_name: &str) -> ServiceError {
    ServiceError::not_found(format!(
        "Domain association {domain_name} not found for app {app_id}."
    ))
}

fn sub_domains(domain_name: &str, settings: Vec<super::types::SubDomainSetting>) -> Vec<SubDomain> {
    settings
        .into_iter()
        .map(|setting| SubDomain {
            dns_record: format!("{}.{domain_name} CNAME d1emulator.cloudfront.net", setting.prefix),
            sub_domain_setting: setting,
            verified: false,
        })
        .collect()
}

/// Move a provisioning association one read closer to its final state.
fn advance(record: &mut DomainRecord, fails: bool) {
    let association = &mut record.association;
    let provisioning = matches!(
        association.domain_status,
        DomainStatus::Creating
            | DomainStatus::RequestingCertificate
            | DomainStatus::InProgress
            | DomainStatus::Updating
    );
    if !provisioning {
        return;
    }

    if fails {
        association.domain_status = DomainStatus::Failed;
        association.status_reason = Some(format!(
            "Unable to verify ownership of {}.",
            association.domain_name
        ));
        return;
    }

    if association.certificate_verification_dns_record.is_none() {
        association.certificate_verification_dns_record = Some(format!(
            "_c0ffee.{} CNAME _d00d.acm-validations.aws.",
            association.domain_name
        ));
    }

    if record.remaining_reads == 0 {
        association.domain_status = DomainStatus::Available;
        for sub in &mut association.sub_domains {
            sub.verified = true;
        }
    } else {
        record.remaining_reads -= 1;
        if association.domain_status != DomainStatus::Updating {
            association.domain_status = DomainStatus::RequestingCertificate;
        }
    }
}

/// Cloneable handle to a running [`AmplifyEmulator`].
#[derive(Clone)]
pub struct EmulatorClient {
    sender: mpsc::Sender<EmulatorRequest>,
}

impl EmulatorClient {
    async fn send(&self, call: ApiCall) -> Result<Reply, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(EmulatorRequest { call, respond_to })
            .await
            .map_err(|_| ServiceError::internal("Amplify emulator is not running"))?;
        response
            .await
            .map_err(|_| ServiceError::internal("Amplify emulator dropped the request"))?
    }
}

#[async_trait]
impl AmplifyApi for EmulatorClient {
    async fn create_app(&self, request: CreateAppRequest) -> Result<App, ServiceError> {
        self.send(ApiCall::CreateApp(request)).await?.into_app()
    }

    async fn get_app(&self, app_id: &str) -> Result<App, ServiceError> {
        self.send(ApiCall::GetApp {
            app_id: app_id.to_string(),
        })
        .await?
        .into_app()
    }

    async fn update_app(&self, app_id: &str, request: UpdateAppRequest) -> Result<App, ServiceError> {
        self.send(ApiCall::UpdateApp {
            app_id: app_id.to_string(),
            request,
        })
        .await?
        .into_app()
    }

    async fn delete_app(&self, app_id: &str) -> Result<(), ServiceError> {
        self.send(ApiCall::DeleteApp {
            app_id: app_id.to_string(),
        })
        .await?
        .into_empty()
    }

    async fn list_apps(&self, next_token: Option<String>) -> Result<Listing<App>, ServiceError> {
        self.send(ApiCall::ListApps { next_token }).await?.into_apps()
    }

    async fn create_branch(
        &self,
        app_id: &str,
        request: CreateBranchRequest,
    ) -> Result<Branch, ServiceError> {
        self.send(ApiCall::CreateBranch {
            app_id: app_id.to_string(),
            request,
        })
        .await?
        .into_branch()
    }

    async fn get_branch(&self, app_id: &str, branch_name: &str) -> Result<Branch, ServiceError> {
        self.send(ApiCall::GetBranch {
            app_id: app_id.to_string(),
            branch_name: branch_name.to_string(),
        })
        .await?
        .into_branch()
    }

    async fn update_branch(
        &self,
        app_id: &str,
        branch_name: &str,
        request: UpdateBranchRequest,
    ) -> Result<Branch, ServiceError> {
        self.send(ApiCall::UpdateBranch {
            app_id: app_id.to_string(),
            branch_name: branch_name.to_string(),
            request,
        })
        .await?
        .into_branch()
    }

    async fn delete_branch(&self, app_id: &str, branch_name: &str) -> Result<(), ServiceError> {
        self.send(ApiCall::DeleteBranch {
            app_id: app_id.to_string(),
            branch_name: branch_name.to_string(),
        })
        .await?
        .into_empty()
    }

    async fn list_branches(
        &self,
        app_id: &str,
        next_token: Option<String>,
    ) -> Result<Listing<Branch>, ServiceError> {
        self.send(ApiCall::ListBranches {
            app_id: app_id.to_string(),
            next_token,
        })
        .await?
        .into_branches()
    }

    async fn create_domain_association(
        &self,
        app_id: &str,
        request: CreateDomainAssociationRequest,
    ) -> Result<DomainAssociation, ServiceError> {
        self.send(ApiCall::CreateDomain {
            app_id: app_id.to_string(),
            request,
        })
        .await?
        .into_domain()
    }

    async fn get_domain_association(
        &self,
        app_id: &str,
        domain_name: &str,
    ) -> Result<DomainAssociation, ServiceError> {
        self.send(ApiCall::GetDomain {
            app_id: app_id.to_string(),
            domain_name: domain_name.to_string(),
        })
        .await?
        .into_domain()
    }

    async fn update_domain_association(
        &self,
        app_id: &str,
        domain_name: &str,
        request: UpdateDomainAssociationRequest,
    ) -> Result<DomainAssociation, ServiceError> {
        self.send(ApiCall::UpdateDomain {
            app_id: app_id.to_string(),
            domain_name: domain_name.to_string(),
            request,
        })
        .await?
        .into_domain()
    }

    async fn delete_domain_association(
        &self,
        app_id: &str,
        domain_name: &str,
    ) -> Result<(), ServiceError> {
        self.send(ApiCall::DeleteDomain {
            app_id: app_id.to_string(),
            domain_name: domain_name.to_string(),
        })
        .await?
        .into_empty()
    }

    async fn list_domain_associations(
        &self,
        app_id: &str,
        next_token: Option<String>,
    ) -> Result<Listing<DomainAssociation>, ServiceError> {
        self.send(ApiCall::ListDomains {
            app_id: app_id.to_string(),
            next_token,
        })
        .await?
        .into_domains()
    }

    async fn tag_resource(
        &self,
        resource_arn: &str,
        tags: BTreeMap<String, String>,
    ) -> Result<(), ServiceError> {
        self.send(ApiCall::TagResource {
            resource_arn: resource_arn.to_string(),
            tags,
        })
        .await?
        .into_empty()
    }

    async fn untag_resource(
        &self,
        resource_arn: &str,
        tag_keys: Vec<String>,
    ) -> Result<(), ServiceError> {
        self.send(ApiCall::UntagResource {
            resource_arn: resource_arn.to_string(),
            tag_keys,
        })
        .await?
        .into_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::types::SubDomainSetting;
    use handler_framework::ServiceErrorKind;

    fn start(config: EmulatorConfig) -> EmulatorClient {
        let (emulator, client) = AmplifyEmulator::new(8, config);
        tokio::spawn(emulator.run());
        client
    }

    fn app_request(name: &str) -> CreateAppRequest {
        CreateAppRequest {
            name: name.to_string(),
            ..CreateAppRequest::default()
        }
    }

    #[tokio::test]
    async fn test_app_ids_and_default_domain() {
        let client = start(EmulatorConfig::default());

        let app = client.create_app(app_request("site")).await.unwrap();

        assert_eq!(app.app_id, "d0000000000001");
        assert_eq!(app.default_domain, "d0000000000001.amplifyapp.com");
        assert_eq!(app.platform, "WEB");
        assert_eq!(client.get_app(&app.app_id).await.unwrap(), app);
    }

    #[tokio::test]
    async fn test_missing_app_carries_request_id() {
        let client = start(EmulatorConfig::default());

        let fault = client.get_app("dmissing").await.unwrap_err();

        assert_eq!(fault.kind, ServiceErrorKind::NotFound);
        assert_eq!(fault.request_id.as_deref(), Some("req-000001"));
    }

    #[tokio::test]
    async fn test_domain_provisioning_advances_per_read() {
        let client = start(EmulatorConfig {
            domain_provisioning_polls: 1,
            ..EmulatorConfig::default()
        });
        let app = client.create_app(app_request("site")).await.unwrap();
        client
            .create_branch(
                &app.app_id,
                CreateBranchRequest {
                    branch_name: "main".into(),
                    ..CreateBranchRequest::default()
                },
            )
            .await
            .unwrap();

        let created = client
            .create_domain_association(
                &app.app_id,
                CreateDomainAssociationRequest {
                    domain_name: "example.com".into(),
                    enable_auto_sub_domain: None,
                    sub_domain_settings: vec![SubDomainSetting {
                        prefix: "www".into(),
                        branch_name: "main".into(),
                    }],
                },
            )
            .await
            .unwrap();
        assert_eq!(created.domain_status, DomainStatus::Creating);

        let first = client
            .get_domain_association(&app.app_id, "example.com")
            .await
            .unwrap();
        assert_eq!(first.domain_status, DomainStatus::RequestingCertificate);
        assert!(first.certificate_verification_dns_record.is_some());

        let second = client
            .get_domain_association(&app.app_id, "example.com")
            .await
            .unwrap();
        assert_eq!(second.domain_status, DomainStatus::Available);
        assert!(second.sub_domains[0].verified);
    }

    #[tokio::test]
    async fn test_failing_domain_reports_reason() {
        let client = start(EmulatorConfig {
            fail_domains: vec!["broken.example".into()],
            ..EmulatorConfig::default()
        });
        let app = client.create_app(app_request("site")).await.unwrap();
        client
            .create_domain_association(
                &app.app_id,
                CreateDomainAssociationRequest {
                    domain_name: "broken.example".into(),
                    ..CreateDomainAssociationRequest::default()
                },
            )
            .await
            .unwrap();

        let read = client
            .get_domain_association(&app.app_id, "broken.example")
            .await
            .unwrap();

        assert_eq!(read.domain_status, DomainStatus::Failed);
        assert!(read.status_reason.unwrap().contains("broken.example"));
    }

    #[tokio::test]
    async fn test_listing_pages_and_cascade_delete() {
        let client = start(EmulatorConfig {
            page_size: 2,
            ..EmulatorConfig::default()
        });
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            ids.push(client.create_app(app_request(name)).await.unwrap().app_id);
        }

        let first = client.list_apps(None).await.unwrap();
        assert_eq!(first.items.len(), 2);
        let second = client.list_apps(first.next_token).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.next_token.is_none());

        client
            .create_branch(
                &ids[0],
                CreateBranchRequest {
                    branch_name: "main".into(),
                    ..CreateBranchRequest::default()
                },
            )
            .await
            .unwrap();
        client.delete_app(&ids[0]).await.unwrap();
        let fault = client.get_branch(&ids[0], "main").await.unwrap_err();
        assert_eq!(fault.kind, ServiceErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_duplicate_branch_is_bad_request() {
        let client = start(EmulatorConfig::default());
        let app = client.create_app(app_request("site")).await.unwrap();
        let request = CreateBranchRequest {
            branch_name: "main".into(),
            ..CreateBranchRequest::default()
        };

        client.create_branch(&app.app_id, request.clone()).await.unwrap();
        let fault = client.create_branch(&app.app_id, request).await.unwrap_err();

        assert_eq!(fault.kind, ServiceErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_closed_emulator_is_internal_failure() {
        let (emulator, client) = AmplifyEmulator::new(1, EmulatorConfig::default());
        drop(emulator);

        let fault = client.list_apps(None).await.unwrap_err();

        assert_eq!(fault.kind, ServiceErrorKind::InternalFailure);
    }
}
