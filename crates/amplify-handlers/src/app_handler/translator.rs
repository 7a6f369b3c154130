//! Mapping between [`AppModel`] and the Amplify app API shapes.

use crate::model::arn;
use crate::model::common::{tags_from_map, tags_to_map, variables_from_map, variables_to_map};
use crate::model::{AppIdentity, AppModel};
use crate::service::types::{App, CreateAppRequest, UpdateAppRequest};
use handler_framework::{HandlerError, ResourceModel};
use std::collections::BTreeMap;

/// The app id, taken from `AppId` or else recovered from `Arn`.
pub fn app_id(model: &AppModel) -> Result<String, HandlerError> {
    model
        .app_id
        .clone()
        .or_else(|| {
            let path = arn::parse(model.arn.as_deref()?)?;
            Some(path.app_id().to_string())
        })
        .ok_or_else(|| {
            HandlerError::invalid_request(
                AppModel::TYPE_NAME,
                model.primary_identifier(),
                "AppId or Arn is required",
            )
        })
}

pub fn create_request(model: &AppModel) -> Result<CreateAppRequest, HandlerError> {
    let name = model
        .name
        .clone()
        .ok_or_else(|| {
            HandlerError::invalid_request(
                AppModel::TYPE_NAME,
                model.primary_identifier(),
                "Name is required",
            )
        })?;
    Ok(CreateAppRequest {
        name,
        description: model.description.clone(),
        repository: model.repository.clone(),
        platform: model.platform.clone(),
        iam_service_role_arn: model.iam_service_role.clone(),
        enable_branch_auto_build: model.enable_branch_auto_build,
        environment_variables: variables_to_map(model.environment_variables.as_deref()),
        tags: tags_to_map(model.tags.as_deref()),
    })
}

pub fn update_request(model: &AppModel) -> UpdateAppRequest {
    UpdateAppRequest {
        name: model.name.clone(),
        description: model.description.clone(),
        platform: model.platform.clone(),
        iam_service_role_arn: model.iam_service_role.clone(),
        enable_branch_auto_build: model.enable_branch_auto_build,
        environment_variables: variables_to_map(model.environment_variables.as_deref()),
    }
}

pub fn identity(app: &App) -> AppIdentity {
    AppIdentity {
        app_id: app.app_id.clone(),
        arn: app.app_arn.clone(),
    }
}

pub fn from_app(app: &App) -> AppModel {
    AppModel {
        app_id: Some(app.app_id.clone()),
        app_name: Some(app.name.clone()),
        arn: Some(app.app_arn.clone()),
        default_domain: Some(app.default_domain.clone()),
        name: Some(app.name.clone()),
        description: app.description.clone(),
        repository: app.repository.clone(),
        platform: Some(app.platform.clone()),
        iam_service_role: app.iam_service_role_arn.clone(),
        enable_branch_auto_build: Some(app.enable_branch_auto_build),
        environment_variables: variables_from_map(&app.environment_variables),
        tags: tags_from_map(&app.tags),
    }
}

pub fn desired_tags(model: &AppModel) -> BTreeMap<String, String> {
    tags_to_map(model.tags.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnvironmentVariable, Tag};

    #[test]
    fn test_app_id_falls_back_to_arn() {
        let model = AppModel {
            arn: Some("arn:aws:amplify:us-east-1:123456789012:apps/d2abc".into()),
            ..AppModel::default()
        };
        assert_eq!(app_id(&model).unwrap(), "d2abc");

        let err = app_id(&AppModel::named("site")).unwrap_err();
        assert_eq!(err.code(), handler_framework::HandlerErrorCode::InvalidRequest);
    }

    #[test]
    fn test_create_request_flattens_lists() {
        let model = AppModel {
            environment_variables: Some(vec![EnvironmentVariable::new("STAGE", "prod")]),
            tags: Some(vec![Tag::new("team", "web")]),
            ..AppModel::named("site")
        };

        let request = create_request(&model).unwrap();

        assert_eq!(request.name, "site");
        assert_eq!(request.environment_variables["STAGE"], "prod");
        assert_eq!(request.tags["team"], "web");
    }

    #[test]
    fn test_from_app_fills_read_only_properties() {
        let app = App {
            app_id: "d2abc".into(),
            app_arn: "arn:aws:amplify:us-east-1:123456789012:apps/d2abc".into(),
            name: "site".into(),
            default_domain: "d2abc.amplifyapp.com".into(),
            ..App::default()
        };

        let model = from_app(&app);

        assert_eq!(
            model.read_only_properties(),
            vec!["AppId", "AppName", "Arn", "DefaultDomain"]
        );
        assert!(model.tags.is_none());
    }
}
