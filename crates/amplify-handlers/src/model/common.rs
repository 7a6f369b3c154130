use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

pub(crate) fn tags_to_map(tags: Option<&[Tag]>) -> BTreeMap<String, String> {
    tags.unwrap_or_default()
        .iter()
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect()
}

/// `None` for an empty map, so reads round-trip a template that omits the property.
pub(crate) fn tags_from_map(tags: &BTreeMap<String, String>) -> Option<Vec<Tag>> {
    (!tags.is_empty()).then(|| tags.iter().map(|(k, v)| Tag::new(k, v)).collect())
}

pub(crate) fn variables_to_map(variables: Option<&[EnvironmentVariable]>) -> BTreeMap<String, String> {
    variables
        .unwrap_or_default()
        .iter()
        .map(|v| (v.name.clone(), v.value.clone()))
        .collect()
}

pub(crate) fn variables_from_map(
    variables: &BTreeMap<String, String>,
) -> Option<Vec<EnvironmentVariable>> {
    (!variables.is_empty()).then(|| {
        variables
            .iter()
            .map(|(k, v)| EnvironmentVariable::new(k, v))
            .collect()
    })
}
