use handler_framework::ResourceModel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubDomainSetting {
    pub prefix: String,
    pub branch_name: String,
}

impl SubDomainSetting {
    pub fn new(prefix: impl Into<String>, branch_name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            branch_name: branch_name.into(),
        }
    }
}

/// Desired or observed state of an `AWS::Amplify::Domain` (a custom domain association).
///
/// Provisioning a domain creates a CDN distribution and requests a certificate, so
/// unlike apps and branches it is only usable once the service reports a settled
/// `DomainStatus`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_record: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_auto_sub_domain: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_domain_settings: Option<Vec<SubDomainSetting>>,
}

impl DomainModel {
    pub fn new(app_id: impl Into<String>, domain_name: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            domain_name: Some(domain_name.into()),
            ..Self::default()
        }
    }

    pub fn with_sub_domain(mut self, prefix: &str, branch_name: &str) -> Self {
        self.sub_domain_settings
            .get_or_insert_with(Vec::new)
            .push(SubDomainSetting::new(prefix, branch_name));
        self
    }
}

impl ResourceModel for DomainModel {
    const TYPE_NAME: &'static str = "AWS::Amplify::Domain";
    /// The domain association ARN.
    type Identity = String;

    fn primary_identifier(&self) -> String {
        match (&self.arn, &self.app_id, &self.domain_name) {
            (Some(arn), _, _) => arn.clone(),
            (None, Some(app_id), Some(domain_name)) => format!("{app_id}/{domain_name}"),
            _ => self.domain_name.clone().unwrap_or_default(),
        }
    }

    fn read_only_properties(&self) -> Vec<&'static str> {
        [
            ("Arn", self.arn.is_some()),
            ("DomainStatus", self.domain_status.is_some()),
            ("StatusReason", self.status_reason.is_some()),
            ("CertificateRecord", self.certificate_record.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    fn apply_identity(&mut self, arn: &String) {
        self.arn = Some(arn.clone());
    }
}
