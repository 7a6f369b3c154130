//! Mapping between [`BranchModel`] and the Amplify branch API shapes.

use crate::model::arn::{self, ResourcePath};
use crate::model::common::{tags_from_map, tags_to_map, variables_from_map, variables_to_map};
use crate::model::BranchModel;
use crate::service::types::{Branch, CreateBranchRequest, UpdateBranchRequest};
use handler_framework::{HandlerError, ResourceModel};

/// `(app_id, branch_name)` from the model's properties, or else from its ARN.
pub fn locate(model: &BranchModel) -> Result<(String, String), HandlerError> {
    if let (Some(app_id), Some(branch_name)) = (&model.app_id, &model.branch_name) {
        return Ok((app_id.clone(), branch_name.clone()));
    }
    match model.arn.as_deref().and_then(arn::parse) {
        Some(ResourcePath::Branch {
            app_id,
            branch_name,
        }) => Ok((app_id, branch_name)),
        _ => Err(HandlerError::invalid_request(
            BranchModel::TYPE_NAME,
            model.primary_identifier(),
            "AppId and BranchName, or a branch Arn, are required",
        )),
    }
}

pub fn create_request(model: &BranchModel) -> Result<(String, CreateBranchRequest), HandlerError> {
    let (app_id, branch_name) = locate(model)?;
    let request = CreateBranchRequest {
        branch_name,
        description: model.description.clone(),
        stage: model.stage.clone(),
        framework: model.framework.clone(),
        enable_auto_build: model.enable_auto_build,
        enable_pull_request_preview: model.enable_pull_request_preview,
        environment_variables: variables_to_map(model.environment_variables.as_deref()),
        tags: tags_to_map(model.tags.as_deref()),
    };
    Ok((app_id, request))
}

pub fn update_request(model: &BranchModel) -> UpdateBranchRequest {
    UpdateBranchRequest {
        description: model.description.clone(),
        stage: model.stage.clone(),
        framework: model.framework.clone(),
        enable_auto_build: model.enable_auto_build,
        enable_pull_request_preview: model.enable_pull_request_preview,
        environment_variables: variables_to_map(model.environment_variables.as_deref()),
    }
}

pub fn from_branch(app_id: &str, branch: &Branch) -> BranchModel {
    BranchModel {
        app_id: Some(app_id.to_string()),
        arn: Some(branch.branch_arn.clone()),
        branch_name: Some(branch.branch_name.clone()),
        description: branch.description.clone(),
        stage: branch.stage.clone(),
        framework: branch.framework.clone(),
        enable_auto_build: Some(branch.enable_auto_build),
        enable_pull_request_preview: Some(branch.enable_pull_request_preview),
        environment_variables: variables_from_map(&branch.environment_variables),
        tags: tags_from_map(&branch.tags),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_prefers_properties_then_arn() {
        let model = BranchModel::new("d2abc", "main");
        assert_eq!(locate(&model).unwrap(), ("d2abc".into(), "main".into()));

        let by_arn = BranchModel {
            arn: Some("arn:aws:amplify:us-east-1:123456789012:apps/d2abc/branches/dev".into()),
            ..BranchModel::default()
        };
        assert_eq!(locate(&by_arn).unwrap(), ("d2abc".into(), "dev".into()));
    }

    #[test]
    fn test_locate_rejects_app_arn() {
        let model = BranchModel {
            arn: Some("arn:aws:amplify:us-east-1:123456789012:apps/d2abc".into()),
            ..BranchModel::default()
        };
        assert!(locate(&model).is_err());
    }
}
