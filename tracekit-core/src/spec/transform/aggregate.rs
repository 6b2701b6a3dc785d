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
use crate::spec::transform::{default_enabled, TransformSpecTrait};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracekit_common::error::{Result, TraceKitError};

/// Reduces the trace (or each group of a split trace) with one function per target field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateTransformSpec {
    pub aggregations: AggregationSet,

    pub enabled: bool,
}

impl Default for AggregateTransformSpec {
    fn default() -> Self {
        Self {
            aggregations: Default::default(),
            enabled: true,
        }
    }
}

impl TransformSpecTrait for AggregateTransformSpec {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn validate(&self) -> Result<()> {
        self.aggregations.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub target: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub func: AggregateFunc,
}

impl Aggregation {
    pub fn new<S: Into<String>>(target: S, func: AggregateFunc) -> Self {
        Self {
            target: target.into(),
            enabled: true,
            func,
        }
    }
}

/// Ordered aggregation entries of an aggregate transform, unique by `target`.
///
/// The set itself has no length restriction. Chart editors commonly expose only
/// [`AggregationSet::first_editable`] in their form; that is a presentation policy
/// of the editor and not a constraint on the data held here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Aggregation>", into = "Vec<Aggregation>")]
pub struct AggregationSet {
    aggregations: Vec<Aggregation>,
}

impl TryFrom<Vec<Aggregation>> for AggregationSet {
    type Error = TraceKitError;

    fn try_from(aggregations: Vec<Aggregation>) -> std::result::Result<Self, Self::Error> {
        Self::try_new(aggregations)
    }
}

impl From<AggregationSet> for Vec<Aggregation> {
    fn from(set: AggregationSet) -> Self {
        set.aggregations
    }
}

impl AggregationSet {
    pub fn try_new(aggregations: Vec<Aggregation>) -> Result<Self> {
        let set = Self { aggregations };
        set.validate()?;
        Ok(set)
    }

    /// Set holding a single entry, which can't repeat a target
    pub(crate) fn single(aggregation: Aggregation) -> Self {
        Self {
            aggregations: vec![aggregation],
        }
    }

    pub fn aggregations(&self) -> &[Aggregation] {
        &self.aggregations
    }

    pub fn len(&self) -> usize {
        self.aggregations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aggregation> {
        self.aggregations.iter()
    }

    pub fn get(&self, target: &str) -> Option<&Aggregation> {
        self.aggregations.iter().find(|aggr| aggr.target == target)
    }

    /// Replace the function of the entry for `target`, keeping entry order
    pub fn set_func(&self, target: &str, func: AggregateFunc) -> Result<Self> {
        self.modify(target, |aggr| aggr.func = func)
    }

    pub fn set_enabled(&self, target: &str, enabled: bool) -> Result<Self> {
        self.modify(target, |aggr| aggr.enabled = enabled)
    }

    /// Append an entry for a new target
    pub fn insert(&self, aggregation: Aggregation) -> Result<Self> {
        if self.get(&aggregation.target).is_some() {
            return Err(TraceKitError::specification(format!(
                "Aggregation target {} is already present",
                aggregation.target
            )));
        }
        let mut aggregations = self.aggregations.clone();
        aggregations.push(aggregation);
        Ok(Self { aggregations })
    }

    /// First enabled entry with a non-empty target
    pub fn first_editable(&self) -> Option<&Aggregation> {
        self.aggregations
            .iter()
            .find(|aggr| aggr.enabled && !aggr.target.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        let duplicates: Vec<_> = self
            .aggregations
            .iter()
            .map(|aggr| aggr.target.as_str())
            .duplicates()
            .collect();
        if !duplicates.is_empty() {
            return Err(TraceKitError::specification(format!(
                "Duplicate aggregation targets: {}",
                duplicates.join(", ")
            )));
        }
        Ok(())
    }

    fn modify<F>(&self, target: &str, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Aggregation),
    {
        let mut aggregations = self.aggregations.clone();
        let aggr = aggregations
            .iter_mut()
            .find(|aggr| aggr.target == target)
            .ok_or_else(|| {
                TraceKitError::target_not_found(format!(
                    "No aggregation targets {target}, available targets: [{}]",
                    self.aggregations.iter().map(|aggr| &aggr.target).join(", ")
                ))
            })?;
        f(aggr);
        Ok(Self { aggregations })
    }
}

impl<'a> IntoIterator for &'a AggregationSet {
    type Item = &'a Aggregation;
    type IntoIter = std::slice::Iter<'a, Aggregation>;

    fn into_iter(self) -> Self::IntoIter {
        self.aggregations.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Median,
    Mode,
    Rms,
    Stddev,
    Min,
    Max,
    #[default]
    First,
    Last,
    Range,
}

impl AggregateFunc {
    /// All functions in the order the editor lists them
    pub const ALL: [AggregateFunc; 12] = [
        AggregateFunc::Count,
        AggregateFunc::Sum,
        AggregateFunc::Avg,
        AggregateFunc::Median,
        AggregateFunc::Mode,
        AggregateFunc::Rms,
        AggregateFunc::Stddev,
        AggregateFunc::Min,
        AggregateFunc::Max,
        AggregateFunc::First,
        AggregateFunc::Last,
        AggregateFunc::Range,
    ];

    pub fn name(&self) -> &'static str {
        use AggregateFunc::*;
        match self {
            Count => "count",
            Sum => "sum",
            Avg => "avg",
            Median => "median",
            Mode => "mode",
            Rms => "rms",
            Stddev => "stddev",
            Min => "min",
            Max => "max",
            First => "first",
            Last => "last",
            Range => "range",
        }
    }

    pub fn label(&self) -> &'static str {
        use AggregateFunc::*;
        match self {
            Count => "Count",
            Sum => "Sum",
            Avg => "Average",
            Median => "Median",
            Mode => "Mode",
            Rms => "RMS",
            Stddev => "Standard Deviation",
            Min => "Min",
            Max => "Max",
            First => "First",
            Last => "Last",
            Range => "Range",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn xy_set() -> AggregationSet {
        AggregationSet::try_new(vec![
            Aggregation::new("y", AggregateFunc::First),
            Aggregation::new("x", AggregateFunc::Sum),
        ])
        .unwrap()
    }

    #[test]
    fn set_func_keeps_order() {
        let set = xy_set().set_func("y", AggregateFunc::Median).unwrap();
        let targets: Vec<_> = set.iter().map(|aggr| aggr.target.as_str()).collect();
        assert_eq!(targets, vec!["y", "x"]);
        assert_eq!(set.get("y").unwrap().func, AggregateFunc::Median);
        assert_eq!(set.get("x").unwrap().func, AggregateFunc::Sum);
    }

    #[test]
    fn set_func_on_missing_target_fails_without_change() {
        let set = xy_set();
        let err = set.set_func("z", AggregateFunc::Sum).unwrap_err();
        assert!(matches!(err, TraceKitError::TargetNotFoundError(..)));
        assert_eq!(set, xy_set());
    }

    #[test]
    fn insert_rejects_duplicate_target() {
        let err = xy_set()
            .insert(Aggregation::new("x", AggregateFunc::Max))
            .unwrap_err();
        assert!(matches!(err, TraceKitError::SpecificationError(..)));
    }

    #[test]
    fn try_new_rejects_duplicate_target() {
        let result = AggregationSet::try_new(vec![
            Aggregation::new("y", AggregateFunc::First),
            Aggregation::new("y", AggregateFunc::Last),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_rejects_duplicate_target() {
        let result = serde_json::from_value::<AggregationSet>(json!([
            {"target": "y", "func": "sum"},
            {"target": "y", "func": "max"}
        ]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Duplicate aggregation targets: y"));

        let result = serde_json::from_value::<AggregateTransformSpec>(json!({
            "aggregations": [{"target": "x"}, {"target": "x", "func": "avg"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn first_editable_skips_disabled_and_blank() {
        let set = AggregationSet::try_new(vec![
            Aggregation::new("", AggregateFunc::Count),
            Aggregation {
                target: "x".to_string(),
                enabled: false,
                func: AggregateFunc::Sum,
            },
            Aggregation::new("y", AggregateFunc::Avg),
        ])
        .unwrap();
        assert_eq!(set.first_editable().unwrap().target, "y");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn serializes_as_plain_array() {
        let value = serde_json::to_value(xy_set()).unwrap();
        assert_eq!(
            value,
            json!([
                {"target": "y", "enabled": true, "func": "first"},
                {"target": "x", "enabled": true, "func": "sum"}
            ])
        );
    }

    #[test]
    fn func_names_match_serialized_form() {
        for func in AggregateFunc::ALL {
            assert_eq!(serde_json::to_value(func).unwrap(), json!(func.name()));
        }
        assert_eq!(AggregateFunc::Stddev.label(), "Standard Deviation");
    }
}
