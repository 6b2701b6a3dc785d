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
pub mod aggregate;
pub mod filter;
pub mod groupby;
pub mod patch;
pub mod sort;

use crate::spec::transform::aggregate::AggregateTransformSpec;
use crate::spec::transform::filter::FilterTransformSpec;
use crate::spec::transform::groupby::GroupbyTransformSpec;
use crate::spec::transform::sort::SortTransformSpec;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use tracekit_common::error::TraceKitError;

/// The closed vocabulary of transform kinds a trace pipeline can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Filter,
    Groupby,
    Aggregate,
    Sort,
}

impl TransformKind {
    /// All kinds in catalog order
    pub const ALL: [TransformKind; 4] = [
        TransformKind::Filter,
        TransformKind::Groupby,
        TransformKind::Aggregate,
        TransformKind::Sort,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Filter => "filter",
            TransformKind::Groupby => "groupby",
            TransformKind::Aggregate => "aggregate",
            TransformKind::Sort => "sort",
        }
    }

    /// Display label used by the add menu and as the base of fold labels
    pub fn label(&self) -> &'static str {
        match self {
            TransformKind::Filter => "Filter",
            TransformKind::Groupby => "Split",
            TransformKind::Aggregate => "Aggregate",
            TransformKind::Sort => "Sort",
        }
    }

    /// Help sentence shown for this kind when a trace has no transforms yet
    pub fn description(&self) -> &'static str {
        match self {
            TransformKind::Filter => "transforms allow you to filter data out from a trace.",
            TransformKind::Groupby => {
                "transforms allow you to create multiple traces from one source trace, \
                 so as to style them differently."
            }
            TransformKind::Aggregate => {
                "transforms allow you to summarize a trace using an aggregate function \
                 like \"average\" or \"minimum\"."
            }
            TransformKind::Sort => {
                "transforms allow you to sort a trace, so as to control marker overlay \
                 or line connection order."
            }
        }
    }

    /// Whether a pipeline may hold more than one transform of this kind
    pub fn is_singleton(&self) -> bool {
        !matches!(self, TransformKind::Filter)
    }

    /// Attributes the edit form may set on a transform of this kind
    pub fn attributes(&self) -> &'static [&'static str] {
        match self {
            TransformKind::Filter => &["enabled", "target", "targetsrc", "operation", "value"],
            TransformKind::Groupby => &["enabled", "groups", "groupssrc", "styles"],
            TransformKind::Aggregate => &["enabled", "aggregations"],
            TransformKind::Sort => &["enabled", "target", "targetsrc", "order"],
        }
    }
}

impl Display for TransformKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformKind {
    type Err = TraceKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransformKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TraceKitError::invalid_kind(format!("Unknown transform kind: {s}")))
    }
}

/// One stage of a trace's transform pipeline, serialized the way the charting
/// engine expects it: `{"type": "<kind>", ...fields, "enabled": bool}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transform {
    Filter(FilterTransformSpec),
    Groupby(GroupbyTransformSpec),
    Aggregate(AggregateTransformSpec),
    Sort(SortTransformSpec),
}

impl Deref for Transform {
    type Target = dyn TransformSpecTrait;

    fn deref(&self) -> &Self::Target {
        match self {
            Transform::Filter(t) => t,
            Transform::Groupby(t) => t,
            Transform::Aggregate(t) => t,
            Transform::Sort(t) => t,
        }
    }
}

impl Transform {
    pub fn kind(&self) -> TransformKind {
        match self {
            Transform::Filter(_) => TransformKind::Filter,
            Transform::Groupby(_) => TransformKind::Groupby,
            Transform::Aggregate(_) => TransformKind::Aggregate,
            Transform::Sort(_) => TransformKind::Sort,
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateTransformSpec> {
        match self {
            Transform::Aggregate(spec) => Some(spec),
            _ => None,
        }
    }
}

pub trait TransformSpecTrait {
    fn enabled(&self) -> bool;

    /// Data-source reference this transform is keyed on, used to suffix its label
    fn source_reference(&self) -> Option<&str> {
        None
    }

    /// Check invariants local to this transform
    fn validate(&self) -> tracekit_common::error::Result<()> {
        Ok(())
    }
}

pub(crate) fn default_enabled() -> bool {
    true
}
