/*
 * TraceKit
 * Copyright (C) 2022 Jon Mease
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public
 * License along with this program.
 * If not, see http://www.gnu.org/licenses/.
 */
use crate::spec::transform::TransformSpecTrait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keeps or drops data points by comparing `target` to `value` with `operation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterTransformSpec {
    pub target: Vec<String>,

    pub targetsrc: Option<String>,

    pub operation: FilterOperation,

    pub value: Value,

    pub enabled: bool,
}

impl Default for FilterTransformSpec {
    fn default() -> Self {
        Self {
            target: Vec::new(),
            targetsrc: None,
            operation: Default::default(),
            value: Value::String(String::new()),
            enabled: true,
        }
    }
}

impl TransformSpecTrait for FilterTransformSpec {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn source_reference(&self) -> Option<&str> {
        self.targetsrc.as_deref().filter(|src| !src.is_empty())
    }
}

/// Comparison operators understood by the charting engine's filter transform.
///
/// Bracketed operators compare against a `[lower, upper]` pair in `value`: inward
/// facing brackets keep points inside the range, outward facing ones keep points
/// outside it, and square vs round brackets select inclusive vs exclusive bounds.
/// `{}` and `}{` test membership in a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterOperation {
    #[serde(rename = "=")]
    Equal,
    #[default]
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "[]")]
    InsideInclusive,
    #[serde(rename = "()")]
    InsideExclusive,
    #[serde(rename = "[)")]
    InsideInclusiveLower,
    #[serde(rename = "(]")]
    InsideInclusiveUpper,
    #[serde(rename = "][")]
    OutsideInclusive,
    #[serde(rename = ")(")]
    OutsideExclusive,
    #[serde(rename = "](")]
    OutsideInclusiveLower,
    #[serde(rename = ")[")]
    OutsideInclusiveUpper,
    #[serde(rename = "{}")]
    In,
    #[serde(rename = "}{")]
    NotIn,
}

impl FilterOperation {
    pub const ALL: [FilterOperation; 16] = [
        FilterOperation::Equal,
        FilterOperation::NotEqual,
        FilterOperation::Less,
        FilterOperation::GreaterOrEqual,
        FilterOperation::Greater,
        FilterOperation::LessOrEqual,
        FilterOperation::InsideInclusive,
        FilterOperation::InsideExclusive,
        FilterOperation::InsideInclusiveLower,
        FilterOperation::InsideInclusiveUpper,
        FilterOperation::OutsideInclusive,
        FilterOperation::OutsideExclusive,
        FilterOperation::OutsideInclusiveLower,
        FilterOperation::OutsideInclusiveUpper,
        FilterOperation::In,
        FilterOperation::NotIn,
    ];

    pub fn symbol(&self) -> &'static str {
        use FilterOperation::*;
        match self {
            Equal => "=",
            NotEqual => "!=",
            Less => "<",
            GreaterOrEqual => ">=",
            Greater => ">",
            LessOrEqual => "<=",
            InsideInclusive => "[]",
            InsideExclusive => "()",
            InsideInclusiveLower => "[)",
            InsideInclusiveUpper => "(]",
            OutsideInclusive => "][",
            OutsideExclusive => ")(",
            OutsideInclusiveLower => "](",
            OutsideInclusiveUpper => ")[",
            In => "{}",
            NotIn => "}{",
        }
    }

    /// True for operators whose value is a `[lower, upper]` pair
    pub fn is_range(&self) -> bool {
        use FilterOperation::*;
        matches!(
            self,
            InsideInclusive
                | InsideExclusive
                | InsideInclusiveLower
                | InsideInclusiveUpper
                | OutsideInclusive
                | OutsideExclusive
                | OutsideInclusiveLower
                | OutsideInclusiveUpper
        )
    }

    /// True for operators whose value is a list of members
    pub fn is_set(&self) -> bool {
        matches!(self, FilterOperation::In | FilterOperation::NotIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn symbols_match_serialized_form() {
        for op in FilterOperation::ALL {
            assert_eq!(serde_json::to_value(op).unwrap(), json!(op.symbol()));
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        let spec: FilterTransformSpec = serde_json::from_value(json!({"operation": ">"})).unwrap();
        assert_eq!(spec.operation, FilterOperation::Greater);
        assert_eq!(spec.value, json!(""));
        assert!(spec.target.is_empty());
        assert!(spec.enabled);
    }

    #[test]
    fn operator_families() {
        assert!(FilterOperation::InsideExclusive.is_range());
        assert!(!FilterOperation::NotEqual.is_range());
        assert!(FilterOperation::NotIn.is_set());
        assert_eq!(
            FilterOperation::ALL.iter().filter(|op| op.is_range()).count(),
            8
        );
    }
}
