//! Requests handed to the reconciler by the invoking framework.

use crate::context::CallbackContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Create => "CREATE",
            OperationKind::Read => "READ",
            OperationKind::Update => "UPDATE",
            OperationKind::Delete => "DELETE",
            OperationKind::List => "LIST",
        };
        f.write_str(name)
    }
}

/// Desired and previous state for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceHandlerRequest<M> {
    pub desired_resource_state: M,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_resource_state: Option<M>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_resource_identifier: Option<String>,
}

impl<M> ResourceHandlerRequest<M> {
    pub fn new(desired: M) -> Self {
        Self {
            desired_resource_state: desired,
            previous_resource_state: None,
            next_token: None,
            logical_resource_identifier: None,
        }
    }

    pub fn with_previous(mut self, previous: M) -> Self {
        self.previous_resource_state = Some(previous);
        self
    }

    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }

    pub fn with_logical_id(mut self, logical_id: impl Into<String>) -> Self {
        self.logical_resource_identifier = Some(logical_id.into());
        self
    }
}

/// JSON envelope accepted by [`Reconciler::handle_envelope`](crate::Reconciler::handle_envelope).
///
/// ```json
/// {
///   "action": "CREATE",
///   "desiredResourceState": { "AppId": "d1", "DomainName": "example.com" },
///   "callbackContext": { "identity": "arn:…", "mutationIssued": true }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerRequestEnvelope<M, I> {
    pub action: OperationKind,
    #[serde(flatten)]
    pub request: ResourceHandlerRequest<M>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<CallbackContext<I>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_parses_without_context() {
        let envelope: HandlerRequestEnvelope<serde_json::Value, String> =
            serde_json::from_value(json!({
                "action": "DELETE",
                "desiredResourceState": { "AppId": "d1" },
                "logicalResourceIdentifier": "MyApp"
            }))
            .unwrap();

        assert_eq!(envelope.action, OperationKind::Delete);
        assert_eq!(envelope.request.desired_resource_state["AppId"], "d1");
        assert_eq!(
            envelope.request.logical_resource_identifier.as_deref(),
            Some("MyApp")
        );
        assert!(envelope.callback_context.is_none());
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Site {
        name: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct SiteArn(String);

    #[test]
    fn test_envelope_accepts_types_without_default() {
        let envelope: HandlerRequestEnvelope<Site, SiteArn> = serde_json::from_value(json!({
            "action": "UPDATE",
            "desiredResourceState": { "name": "docs" },
            "callbackContext": { "identity": "arn:site/docs", "mutationIssued": true }
        }))
        .unwrap();

        assert!(envelope.request.previous_resource_state.is_none());
        let context = envelope.callback_context.unwrap();
        assert_eq!(context.identity, Some(SiteArn("arn:site/docs".into())));
        assert_eq!(context.stabilization_attempts, 0);

        let bare: CallbackContext<SiteArn> = serde_json::from_str("{}").unwrap();
        assert!(bare.identity.is_none());
    }

    #[test]
    fn test_kind_display_matches_wire_name() {
        let wire = serde_json::to_value(OperationKind::List).unwrap();
        assert_eq!(wire, json!(OperationKind::List.to_string()));
    }
}
