use super::common::{EnvironmentVariable, Tag};
use handler_framework::ResourceModel;
use serde::{Deserialize, Serialize};

/// Desired or observed state of an `AWS::Amplify::App`.
///
/// # Handler Framework
/// This struct implements [`ResourceModel`], so it can be driven by a
/// [`Reconciler`](handler_framework::Reconciler) through
/// [`AppHandler`](crate::app_handler::AppHandler).
///
/// `AppId`, `AppName`, `Arn` and `DefaultDomain` are assigned by the service and must
/// not be supplied on create.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_service_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_branch_auto_build: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<Vec<EnvironmentVariable>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl AppModel {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// What the service assigns when an app is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppIdentity {
    pub app_id: String,
    pub arn: String,
}

impl ResourceModel for AppModel {
    const TYPE_NAME: &'static str = "AWS::Amplify::App";
    type Identity = AppIdentity;

    fn primary_identifier(&self) -> String {
        self.arn
            .clone()
            .or_else(|| self.app_id.clone())
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }

    fn read_only_properties(&self) -> Vec<&'static str> {
        [
            ("AppId", self.app_id.is_some()),
            ("AppName", self.app_name.is_some()),
            ("Arn", self.arn.is_some()),
            ("DefaultDomain", self.default_domain.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    fn apply_identity(&mut self, identity: &AppIdentity) {
        self.app_id = Some(identity.app_id.clone());
        self.arn = Some(identity.arn.clone());
    }
}
