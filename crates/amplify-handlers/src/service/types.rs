//! Request and response shapes of the Amplify API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub app_id: String,
    pub app_arn: String,
    pub name: String,
    pub description: Option<String>,
    pub repository: Option<String>,
    pub platform: String,
    pub default_domain: String,
    pub iam_service_role_arn: Option<String>,
    pub enable_branch_auto_build: bool,
    pub environment_variables: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequest {
    pub name: String,
    pub description: Option<String>,
    pub repository: Option<String>,
    pub platform: Option<String>,
    pub iam_service_role_arn: Option<String>,
    pub enable_branch_auto_build: Option<bool>,
    pub environment_variables: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

/// Full-document replacement of an app's mutable settings. Tags are handled separately.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub platform: Option<String>,
    pub iam_service_role_arn: Option<String>,
    pub enable_branch_auto_build: Option<bool>,
    pub environment_variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub branch_arn: String,
    pub branch_name: String,
    pub description: Option<String>,
    pub stage: Option<String>,
    pub framework: Option<String>,
    pub enable_auto_build: bool,
    pub enable_pull_request_preview: bool,
    pub environment_variables: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRequest {
    pub branch_name: String,
    pub description: Option<String>,
    pub stage: Option<String>,
    pub framework: Option<String>,
    pub enable_auto_build: Option<bool>,
    pub enable_pull_request_preview: Option<bool>,
    pub environment_variables: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranchRequest {
    pub description: Option<String>,
    pub stage: Option<String>,
    pub framework: Option<String>,
    pub enable_auto_build: Option<bool>,
    pub enable_pull_request_preview: Option<bool>,
    pub environment_variables: BTreeMap<String, String>,
}

/// Provisioning state of a custom domain association.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DomainStatus {
    PendingVerification,
    InProgress,
    Available,
    PendingDeployment,
    Failed,
    #[default]
    Creating,
    RequestingCertificate,
    Updating,
    /// A status this client does not know about.
    Unknown(String),
}

impl DomainStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DomainStatus::PendingVerification => "PENDING_VERIFICATION",
            DomainStatus::InProgress => "IN_PROGRESS",
            DomainStatus::Available => "AVAILABLE",
            DomainStatus::PendingDeployment => "PENDING_DEPLOYMENT",
            DomainStatus::Failed => "FAILED",
            DomainStatus::Creating => "CREATING",
            DomainStatus::RequestingCertificate => "REQUESTING_CERTIFICATE",
            DomainStatus::Updating => "UPDATING",
            DomainStatus::Unknown(other) => other,
        }
    }
}

impl From<&str> for DomainStatus {
    fn from(value: &str) -> Self {
        match value {
            "PENDING_VERIFICATION" => DomainStatus::PendingVerification,
            "IN_PROGRESS" => DomainStatus::InProgress,
            "AVAILABLE" => DomainStatus::Available,
            "PENDING_DEPLOYMENT" => DomainStatus::PendingDeployment,
            "FAILED" => DomainStatus::Failed,
            "CREATING" => DomainStatus::Creating,
            "REQUESTING_CERTIFICATE" => DomainStatus::RequestingCertificate,
            "UPDATING" => DomainStatus::Updating,
            other => DomainStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DomainStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DomainStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DomainStatus::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubDomainSetting {
    pub prefix: String,
    pub branch_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubDomain {
    pub sub_domain_setting: SubDomainSetting,
    pub verified: bool,
    pub dns_record: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAssociation {
    pub domain_association_arn: String,
    pub domain_name: String,
    pub enable_auto_sub_domain: bool,
    pub domain_status: DomainStatus,
    pub status_reason: Option<String>,
    pub certificate_verification_dns_record: Option<String>,
    pub sub_domains: Vec<SubDomain>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDomainAssociationRequest {
    pub domain_name: String,
    pub enable_auto_sub_domain: Option<bool>,
    pub sub_domain_settings: Vec<SubDomainSetting>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDomainAssociationRequest {
    pub enable_auto_sub_domain: Option<bool>,
    pub sub_domain_settings: Vec<SubDomainSetting>,
}

/// One page of a list call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: DomainStatus = serde_json::from_str("\"AWAITING_APP_CNAME\"").unwrap();
        assert_eq!(status, DomainStatus::Unknown("AWAITING_APP_CNAME".into()));
        assert_eq!(status.to_string(), "AWAITING_APP_CNAME");
    }

    #[test]
    fn test_known_status_uses_service_spelling() {
        let json = serde_json::to_string(&DomainStatus::RequestingCertificate).unwrap();
        assert_eq!(json, "\"REQUESTING_CERTIFICATE\"");
        assert_eq!(DomainStatus::from("PENDING_VERIFICATION"), DomainStatus::PendingVerification);
    }
}
