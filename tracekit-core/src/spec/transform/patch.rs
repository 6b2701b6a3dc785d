use crate::spec::transform::aggregate::AggregationSet;
use crate::spec::transform::filter::FilterOperation;
use crate::spec::transform::groupby::GroupStyle;
use crate::spec::transform::sort::SortOrder;
use crate::spec::transform::Transform;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracekit_common::error::{Result, TraceKitError};

/// Partial update of a single transform, as sent by the edit form.
///
/// Each field is an attribute of one or more transform kinds. Nullable references
/// (`targetsrc`, `groups`, `groupssrc`) use a nested `Option` so that an explicit
/// JSON `null` clears the attribute while an absent key leaves it untouched.
/// `value` takes JSON `null` as a value of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Vec<String>>,

    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub targetsrc: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<FilterOperation>,

    /// `Some(Value::Null)` sets the comparison value to null
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,

    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub groups: Option<Option<Vec<String>>>,

    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub groupssrc: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Vec<GroupStyle>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<AggregationSet>,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl TransformPatch {
    /// Names of the attributes this patch sets
    pub fn attributes(&self) -> Vec<&'static str> {
        let mut attrs = Vec::new();
        if self.enabled.is_some() {
            attrs.push("enabled");
        }
        if self.target.is_some() {
            attrs.push("target");
        }
        if self.targetsrc.is_some() {
            attrs.push("targetsrc");
        }
        if self.operation.is_some() {
            attrs.push("operation");
        }
        if self.value.is_some() {
            attrs.push("value");
        }
        if self.groups.is_some() {
            attrs.push("groups");
        }
        if self.groupssrc.is_some() {
            attrs.push("groupssrc");
        }
        if self.styles.is_some() {
            attrs.push("styles");
        }
        if self.order.is_some() {
            attrs.push("order");
        }
        if self.aggregations.is_some() {
            attrs.push("aggregations");
        }
        attrs
    }

    pub fn is_empty(&self) -> bool {
        self.attributes().is_empty()
    }
}

impl Transform {
    /// Return a copy of this transform with `patch` applied. The kind never changes,
    /// and a patch naming an attribute this kind doesn't have is rejected as a whole.
    pub fn apply_patch(&self, patch: &TransformPatch) -> Result<Transform> {
        let kind = self.kind();
        let foreign: Vec<_> = patch
            .attributes()
            .into_iter()
            .filter(|attr| !kind.attributes().contains(attr))
            .collect();
        if !foreign.is_empty() {
            return Err(TraceKitError::specification(format!(
                "Attributes [{}] are not valid for {kind} transforms",
                foreign.join(", ")
            )));
        }

        let mut transform = self.clone();
        match &mut transform {
            Transform::Filter(spec) => {
                if let Some(enabled) = patch.enabled {
                    spec.enabled = enabled;
                }
                if let Some(target) = &patch.target {
                    spec.target = target.clone();
                }
                if let Some(targetsrc) = &patch.targetsrc {
                    spec.targetsrc = targetsrc.clone();
                }
                if let Some(operation) = patch.operation {
                    spec.operation = operation;
                }
                if let Some(value) = &patch.value {
                    spec.value = value.clone();
                }
            }
            Transform::Groupby(spec) => {
                if let Some(enabled) = patch.enabled {
                    spec.enabled = enabled;
                }
                if let Some(groups) = &patch.groups {
                    spec.groups = groups.clone();
                }
                if let Some(groupssrc) = &patch.groupssrc {
                    spec.groupssrc = groupssrc.clone();
                }
                if let Some(styles) = &patch.styles {
                    spec.styles = styles.clone();
                }
            }
            Transform::Aggregate(spec) => {
                if let Some(enabled) = patch.enabled {
                    spec.enabled = enabled;
                }
                if let Some(aggregations) = &patch.aggregations {
                    spec.aggregations = aggregations.clone();
                }
            }
            Transform::Sort(spec) => {
                if let Some(enabled) = patch.enabled {
                    spec.enabled = enabled;
                }
                if let Some(target) = &patch.target {
                    spec.target = target.clone();
                }
                if let Some(targetsrc) = &patch.targetsrc {
                    spec.targetsrc = targetsrc.clone();
                }
                if let Some(order) = patch.order {
                    spec.order = order;
                }
            }
        }

        transform.validate()?;
        Ok(transform)
    }
}
