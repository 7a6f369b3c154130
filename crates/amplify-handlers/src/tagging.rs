//! Tag reconciliation for taggable resources (apps and branches).
//!
//! Update calls replace a resource's settings but leave its tags alone, so tags are
//! brought in line separately: keys missing from the desired set are untagged, new or
//! changed keys are tagged. Keys under the reserved `aws:` prefix are never removed.

use crate::service::{AmplifyApi, Operation};
use handler_framework::{HandlerError, ServiceProxy};
use std::collections::BTreeMap;
use tracing::debug;

const RESERVED_PREFIX: &str = "aws:";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagChanges {
    pub to_add: BTreeMap<String, String>,
    pub to_remove: Vec<String>,
}

impl TagChanges {
    pub fn between(desired: &BTreeMap<String, String>, current: &BTreeMap<String, String>) -> Self {
        let to_add = desired
            .iter()
            .filter(|(key, value)| current.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let to_remove = current
            .keys()
            .filter(|key| !desired.contains_key(*key) && !key.starts_with(RESERVED_PREFIX))
            .cloned()
            .collect();
        Self { to_add, to_remove }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Apply `changes` to the resource at `arn`: untag first, then tag.
pub async fn apply(
    proxy: &ServiceProxy<'_, dyn AmplifyApi>,
    arn: &str,
    changes: TagChanges,
) -> Result<(), HandlerError> {
    if changes.is_empty() {
        return Ok(());
    }
    debug!(
        arn,
        added = changes.to_add.len(),
        removed = changes.to_remove.len(),
        "Reconciling tags"
    );

    if !changes.to_remove.is_empty() {
        proxy
            .call(
                Operation::UntagResource.as_str(),
                proxy.client().untag_resource(arn, changes.to_remove),
            )
            .await?;
    }
    if !changes.to_add.is_empty() {
        proxy
            .call(
                Operation::TagResource.as_str(),
                proxy.client().tag_resource(arn, changes.to_add),
            )
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_adds_changes_and_removes() {
        let desired = tags(&[("team", "web"), ("env", "prod")]);
        let current = tags(&[("env", "staging"), ("owner", "alice")]);

        let changes = TagChanges::between(&desired, &current);

        assert_eq!(changes.to_add, tags(&[("env", "prod"), ("team", "web")]));
        assert_eq!(changes.to_remove, vec!["owner".to_string()]);
    }

    #[test]
    fn test_reserved_tags_are_kept() {
        let current = tags(&[("aws:cloudformation:stack-name", "demo")]);
        let changes = TagChanges::between(&BTreeMap::new(), &current);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_identical_sets_need_no_calls() {
        let same = tags(&[("env", "prod")]);
        assert!(TagChanges::between(&same, &same).is_empty());
    }
}
