use super::common::{EnvironmentVariable, Tag};
use handler_framework::ResourceModel;
use serde::{Deserialize, Serialize};

/// Desired or observed state of an `AWS::Amplify::Branch`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BranchModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_auto_build: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_pull_request_preview: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<Vec<EnvironmentVariable>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl BranchModel {
    pub fn new(app_id: impl Into<String>, branch_name: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            branch_name: Some(branch_name.into()),
            ..Self::default()
        }
    }
}

impl ResourceModel for BranchModel {
    const TYPE_NAME: &'static str = "AWS::Amplify::Branch";
    /// The branch ARN.
    type Identity = String;

    fn primary_identifier(&self) -> String {
        match (&self.arn, &self.app_id, &self.branch_name) {
            (Some(arn), _, _) => arn.clone(),
            (None, Some(app_id), Some(branch_name)) => format!("{app_id}/{branch_name}"),
            _ => self.branch_name.clone().unwrap_or_default(),
        }
    }

    fn read_only_properties(&self) -> Vec<&'static str> {
        if self.arn.is_some() {
            vec!["Arn"]
        } else {
            Vec::new()
        }
    }

    fn apply_identity(&mut self, arn: &String) {
        self.arn = Some(arn.clone());
    }
}
