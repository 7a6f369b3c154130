//! # Domain Association Handler
//!
//! `AWS::Amplify::Domain` attaches a custom domain to an app. The association is
//! provisioned asynchronously: the service requests a certificate and sets up the
//! distribution, reporting progress through `DomainStatus`. Create and update therefore
//! poll `GetDomainAssociation` and settle on the status:
//!
//! | status                                                    | create | update |
//! |-----------------------------------------------------------|--------|--------|
//! | `CREATING`, `REQUESTING_CERTIFICATE`, `IN_PROGRESS`       | wait   | wait   |
//! | `UPDATING`                                                | done   | wait   |
//! | `PENDING_VERIFICATION`, `PENDING_DEPLOYMENT`, `AVAILABLE` | done   | done   |
//! | `FAILED`                                                  | fail with the status reason |
//! | anything else                                             | fail   | fail   |
//!
//! `PENDING_VERIFICATION` counts as done: from there on the owner of the DNS zone has
//! to act, and the model already carries the certificate record they need.
//!
//! Associations have a natural key (app id plus domain name), so create looks it up
//! first and refuses to adopt an existing association.

pub mod translator;

use crate::model::DomainModel;
use crate::service::types::DomainStatus;
use crate::service::{AmplifyApi, Operation};
use async_trait::async_trait;
use handler_framework::{
    ExistenceCheck, HandlerError, Page, ResourceHandler, ResourceModel, ResourceTimings,
    ServiceProxy,
};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Create,
    Update,
}

pub struct DomainHandler {
    timings: ResourceTimings,
}

impl DomainHandler {
    pub fn new(timings: ResourceTimings) -> Self {
        Self { timings }
    }

    /// One status check. Refreshes `model` from the response once the status settles.
    async fn settle(
        &self,
        phase: Phase,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &mut DomainModel,
    ) -> Result<bool, HandlerError> {
        let (app_id, domain_name) = translator::locate(model)?;
        let association = proxy
            .call(
                Operation::GetDomainAssociation.as_str(),
                proxy.client().get_domain_association(&app_id, &domain_name),
            )
            .await?;

        let status = &association.domain_status;
        let settled = match status {
            DomainStatus::Creating
            | DomainStatus::RequestingCertificate
            | DomainStatus::InProgress => false,
            DomainStatus::Updating => phase == Phase::Create,
            DomainStatus::PendingVerification
            | DomainStatus::PendingDeployment
            | DomainStatus::Available => true,
            DomainStatus::Failed => {
                return Err(HandlerError::not_stabilized(
                    DomainModel::TYPE_NAME,
                    proxy.executor().identifier(),
                    association.status_reason.clone(),
                ));
            }
            DomainStatus::Unknown(other) => {
                return Err(HandlerError::not_stabilized(
                    DomainModel::TYPE_NAME,
                    proxy.executor().identifier(),
                    Some(format!("unrecognized domain status {other}")),
                ));
            }
        };

        if settled {
            *model = translator::from_association(&app_id, &association);
            info!(domain = %domain_name, %status, ?phase, "Domain association settled");
        } else {
            debug!(domain = %domain_name, %status, ?phase, "Domain association still provisioning");
        }
        Ok(settled)
    }
}

#[async_trait]
impl ResourceHandler for DomainHandler {
    type Model = DomainModel;
    type Client = dyn AmplifyApi;

    fn timings(&self) -> &ResourceTimings {
        &self.timings
    }

    fn existence_check(&self) -> ExistenceCheck {
        ExistenceCheck::RejectExisting
    }

    async fn exists(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &DomainModel,
    ) -> Result<bool, HandlerError> {
        let (app_id, domain_name) = translator::locate(model)?;
        let lookup = proxy
            .call(
                Operation::GetDomainAssociation.as_str(),
                proxy.client().get_domain_association(&app_id, &domain_name),
            )
            .await;
        match lookup {
            Ok(_) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }

    #[instrument(skip_all)]
    async fn create(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &DomainModel,
    ) -> Result<String, HandlerError> {
        let (app_id, request) = translator::create_request(model)?;
        let association = proxy
            .call(
                Operation::CreateDomainAssociation.as_str(),
                proxy.client().create_domain_association(&app_id, request),
            )
            .await?;
        debug!(
            arn = %association.domain_association_arn,
            status = %association.domain_status,
            "Domain association requested"
        );
        Ok(association.domain_association_arn)
    }

    async fn read(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &DomainModel,
    ) -> Result<DomainModel, HandlerError> {
        let (app_id, domain_name) = translator::locate(model)?;
        let association = proxy
            .call(
                Operation::GetDomainAssociation.as_str(),
                proxy.client().get_domain_association(&app_id, &domain_name),
            )
            .await?;
        Ok(translator::from_association(&app_id, &association))
    }

    #[instrument(skip_all)]
    async fn update(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        desired: &DomainModel,
        _current: &DomainModel,
    ) -> Result<(), HandlerError> {
        let (app_id, domain_name) = translator::locate(desired)?;
        proxy
            .call(
                Operation::UpdateDomainAssociation.as_str(),
                proxy.client().update_domain_association(
                    &app_id,
                    &domain_name,
                    translator::update_request(desired),
                ),
            )
            .await?;
        Ok(())
    }

    async fn delete(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &DomainModel,
    ) -> Result<(), HandlerError> {
        let (app_id, domain_name) = translator::locate(model)?;
        proxy
            .call(
                Operation::DeleteDomainAssociation.as_str(),
                proxy
                    .client()
                    .delete_domain_association(&app_id, &domain_name),
            )
            .await
    }

    async fn list(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &DomainModel,
        next_token: Option<&str>,
    ) -> Result<Page<DomainModel>, HandlerError> {
        let app_id = model.app_id.clone().ok_or_else(|| {
            HandlerError::invalid_request(
                DomainModel::TYPE_NAME,
                model.primary_identifier(),
                "AppId is required to list domain associations",
            )
        })?;
        let listing = proxy
            .call(
                Operation::ListDomainAssociations.as_str(),
                proxy
                    .client()
                    .list_domain_associations(&app_id, next_token.map(str::to_string)),
            )
            .await?;
        let items = listing
            .items
            .iter()
            .map(|association| translator::from_association(&app_id, association))
            .collect();
        Ok(Page::new(items, listing.next_token))
    }

    async fn is_create_stabilized(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &mut DomainModel,
    ) -> Result<bool, HandlerError> {
        self.settle(Phase::Create, proxy, model).await
    }

    async fn is_update_stabilized(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &mut DomainModel,
    ) -> Result<bool, HandlerError> {
        self.settle(Phase::Update, proxy, model).await
    }
}
