//! # ResourceModel Trait
//!
//! The `ResourceModel` trait is the contract every managed resource shape implements
//! (App, Branch, Domain Association, …). It names the resource type, exposes which
//! read-only properties a caller filled in, and knows how to take on the identity the
//! remote service assigned after a create.
//!
//! # Identity
//! Identity fields (generated ids, ARNs, computed domains) belong to the remote service.
//! After a successful create the pipeline stores the identity in the
//! [`CallbackContext`](crate::CallbackContext) and re-applies it on every later
//! invocation with [`ResourceModel::apply_identity`], because the desired state handed
//! to each invocation never carries it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Desired or observed state of one resource instance.
pub trait ResourceModel:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Resource type name used in logs and error messages (e.g. `AWS::Amplify::App`).
    const TYPE_NAME: &'static str;

    /// Service-assigned identity recorded after a successful create.
    type Identity: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync;

    /// Best identifier available for diagnostics: the ARN when known, otherwise the
    /// natural key supplied by the caller.
    fn primary_identifier(&self) -> String;

    /// Names of read-only properties that carry a value.
    fn read_only_properties(&self) -> Vec<&'static str>;

    /// Copy a service-assigned identity onto the model.
    fn apply_identity(&mut self, identity: &Self::Identity);
}
