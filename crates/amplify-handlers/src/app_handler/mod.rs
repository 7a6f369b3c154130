//! # App Handler
//!
//! `AWS::Amplify::App` is usable as soon as `CreateApp` returns, so create and update
//! do not stabilize. The service generates the app id, so there is no natural key to
//! pre-check and duplicates are not looked for. Deletes are confirmed by polling
//! `GetApp` until it reports `NotFound`.

pub mod translator;

use crate::model::{AppIdentity, AppModel};
use crate::service::{AmplifyApi, Operation};
use crate::tagging::{self, TagChanges};
use async_trait::async_trait;
use handler_framework::{HandlerError, Page, ResourceHandler, ResourceTimings, ServiceProxy};
use tracing::{debug, instrument};

pub struct AppHandler {
    timings: ResourceTimings,
}

impl AppHandler {
    pub fn new(timings: ResourceTimings) -> Self {
        Self { timings }
    }
}

#[async_trait]
impl ResourceHandler for AppHandler {
    type Model = AppModel;
    type Client = dyn AmplifyApi;

    fn timings(&self) -> &ResourceTimings {
        &self.timings
    }

    #[instrument(skip_all)]
    async fn create(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &AppModel,
    ) -> Result<AppIdentity, HandlerError> {
        let request = translator::create_request(model)?;
        let app = proxy
            .call(
                Operation::CreateApp.as_str(),
                proxy.client().create_app(request),
            )
            .await?;
        debug!(app_id = %app.app_id, "App created");
        Ok(translator::identity(&app))
    }

    async fn read(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &AppModel,
    ) -> Result<AppModel, HandlerError> {
        let app_id = translator::app_id(model)?;
        let app = proxy
            .call(Operation::GetApp.as_str(), proxy.client().get_app(&app_id))
            .await?;
        Ok(translator::from_app(&app))
    }

    #[instrument(skip_all)]
    async fn update(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        desired: &AppModel,
        current: &AppModel,
    ) -> Result<(), HandlerError> {
        let app_id = translator::app_id(desired)?;
        let app = proxy
            .call(
                Operation::UpdateApp.as_str(),
                proxy
                    .client()
                    .update_app(&app_id, translator::update_request(desired)),
            )
            .await?;

        let changes = TagChanges::between(
            &translator::desired_tags(desired),
            &translator::desired_tags(current),
        );
        tagging::apply(proxy, &app.app_arn, changes).await
    }

    async fn delete(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        model: &AppModel,
    ) -> Result<(), HandlerError> {
        let app_id = translator::app_id(model)?;
        proxy
            .call(
                Operation::DeleteApp.as_str(),
                proxy.client().delete_app(&app_id),
            )
            .await
    }

    async fn list(
        &self,
        proxy: &ServiceProxy<'_, dyn AmplifyApi>,
        _model: &AppModel,
        next_token: Option<&str>,
    ) -> Result<Page<AppModel>, HandlerError> {
        let listing = proxy
            .call(
                Operation::ListApps.as_str(),
                proxy.client().list_apps(next_token.map(str::to_string)),
            )
            .await?;
        let items = listing.items.iter().map(translator::from_app).collect();
        Ok(Page::new(items, listing.next_token))
    }
}
