//! Mapping between [`DomainModel`] and the Amplify domain association API shapes.

use crate::model::arn::{self, ResourcePath};
use crate::model::{DomainModel, SubDomainSetting};
use crate::service::types::{
    self, CreateDomainAssociationRequest, DomainAssociation, UpdateDomainAssociationRequest,
};
use handler_framework::{HandlerError, ResourceModel};

/// `(app_id, domain_name)` from the model's properties, or else from its ARN.
pub fn locate(model: &DomainModel) -> Result<(String, String), HandlerError> {
    if let (Some(app_id), Some(domain_name)) = (&model.app_id, &model.domain_name) {
        return Ok((app_id.clone(), domain_name.clone()));
    }
    match model.arn.as_deref().and_then(arn::parse) {
        Some(ResourcePath::Domain {
            app_id,
            domain_name,
        }) => Ok((app_id, domain_name)),
        _ => Err(HandlerError::invalid_request(
            DomainModel::TYPE_NAME,
            model.primary_identifier(),
            "AppId and DomainName, or a domain Arn, are required",
        )),
    }
}

fn sub_domain_settings(model: &DomainModel) -> Vec<types::SubDomainSetting> {
    model
        .sub_domain_settings
        .iter()
        .flatten()
        .map(|setting| types::SubDomainSetting {
            prefix: setting.prefix.clone(),
            branch_name: setting.branch_name.clone(),
        })
        .collect()
}

pub fn create_request(
    model: &DomainModel,
) -> Result<(String, CreateDomainAssociationRequest), HandlerError> {
    let (app_id, domain_name) = locate(model)?;
    let request = CreateDomainAssociationRequest {
        domain_name,
        enable_auto_sub_domain: model.enable_auto_sub_domain,
        sub_domain_settings: sub_domain_settings(model),
    };
    Ok((app_id, request))
}

pub fn update_request(model: &DomainModel) -> UpdateDomainAssociationRequest {
    UpdateDomainAssociationRequest {
        enable_auto_sub_domain: model.enable_auto_sub_domain,
        sub_domain_settings: sub_domain_settings(model),
    }
}

pub fn from_association(app_id: &str, association: &DomainAssociation) -> DomainModel {
    let settings: Vec<SubDomainSetting> = association
        .sub_domains
        .iter()
        .map(|sub| {
            SubDomainSetting::new(
                sub.sub_domain_setting.prefix.clone(),
                sub.sub_domain_setting.branch_name.clone(),
            )
        })
        .collect();

    DomainModel {
        app_id: Some(app_id.to_string()),
        arn: Some(association.domain_association_arn.clone()),
        domain_name: Some(association.domain_name.clone()),
        domain_status: Some(association.domain_status.to_string()),
        status_reason: association.status_reason.clone(),
        certificate_record: association.certificate_verification_dns_record.clone(),
        enable_auto_sub_domain: Some(association.enable_auto_sub_domain),
        sub_domain_settings: (!settings.is_empty()).then_some(settings),
    }
}
