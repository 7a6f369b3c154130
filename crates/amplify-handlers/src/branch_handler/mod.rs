//! # Branch Handler
//!
//! `AWS::Amplify::Branch` maps a repository branch onto an app. Like the app itself it
//! is ready when `CreateBranch` returns; the service rejects a duplicate branch name on
//! its own, so no pre-check is made.

pub mod translator;

use crate::model::common::tags_to_map;
use crate::model::BranchModel;
use crate::service::{AmplifyApi, Operation};
use crate::tagging::{self, TagChanges};
use async_trait::async_trait;
use handler_framework::{
    HandlerError, Page, ResourceHandler, ResourceModel, ResourceTimings, ServiceProxy,
};
use tracing::{debug, instrument};

pub struct BranchHandler {
    timings: ResourceTimings,
}

impl BranchHandler {
    pub fn new(timings: ResourceTimings) -> Self {
        Self { timings }
    }
}

#[async_trait]
impl ResourceHandler for BranchHandler {
    type Model = BranchModel;
    type Client = dyn AmplifyApi;

    fn timings(&self) -> &ResourceTimings {
        &self.timings
    }

    #[instrument(skip_all)]
    async fn create(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &BranchModel,
    ) -> Result<String, HandlerError> {
        let (app_id, request) = translator::create_request(model)?;
        let branch = proxy
            .call(
                Operation::CreateBranch.as_str(),
                proxy.client().create_branch(&app_id, request),
            )
            .await?;
        debug!(arn = %branch.branch_arn, "Branch created");
        Ok(branch.branch_arn)
    }

    async fn read(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &BranchModel,
    ) -> Result<BranchModel, HandlerError> {
        let (app_id, branch_name) = translator::locate(model)?;
        let branch = proxy
            .call(
                Operation::GetBranch.as_str(),
                proxy.client().get_branch(&app_id, &branch_name),
            )
            .await?;
        Ok(translator::from_branch(&app_id, &branch))
    }

    #[instrument(skip_all)]
    async fn update(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        desired: &BranchModel,
        current: &BranchModel,
    ) -> Result<(), HandlerError> {
        let (app_id, branch_name) = translator::locate(desired)?;
        let branch = proxy
            .call(
                Operation::UpdateBranch.as_str(),
                proxy.client().update_branch(
                    &app_id,
                    &branch_name,
                    translator::update_request(desired),
                ),
            )
            .await?;

        let changes = TagChanges::between(
            &tags_to_map(desired.tags.as_deref()),
            &tags_to_map(current.tags.as_deref()),
        );
        tagging::apply(proxy, &branch.branch_arn, changes).await
    }

    async fn delete(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &BranchModel,
    ) -> Result<(), HandlerError> {
        let (app_id, branch_name) = translator::locate(model)?;
        proxy
            .call(
                Operation::DeleteBranch.as_str(),
                proxy.client().delete_branch(&app_id, &branch_name),
            )
            .await
    }

    async fn list(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &BranchModel,
        next_token: Option<&str>,
    ) -> Result<Page<BranchModel>, HandlerError> {
        let app_id = model.app_id.clone().ok_or_else(|| {
            HandlerError::invalid_request(
                BranchModel::TYPE_NAME,
                model.primary_identifier(),
                "AppId is required to list branches",
            )
        })?;
        let listing = proxy
            .call(
                Operation::ListBranches.as_str(),
                proxy
                    .client()
                    .list_branches(&app_id, next_token.map(str::to_string)),
            )
            .await?;
        let items = listing
            .items
            .iter()
            .map(|branch| translator::from_branch(&app_id, branch))
            .collect();
        Ok(Page::new(items, listing.next_token))
    }
}
