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
use crate::catalog::{KindOption, TransformCatalog};
use crate::spec::series::{SeriesContext, SeriesType};
use crate::spec::transform::aggregate::AggregateFunc;
use crate::spec::transform::patch::TransformPatch;
use crate::spec::transform::{Transform, TransformKind};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::TryFrom;
use tracekit_common::error::{Result, ResultWithContext, TraceKitError};

/// Ordered transforms attached to one series. Position in the pipeline is the
/// execution order downstream and the address the editor uses for later edits.
///
/// Every edit returns a new, validated pipeline and leaves the original untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Transform>", into = "Vec<Transform>")]
pub struct TransformPipeline {
    transforms: Vec<Transform>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Empty,
    Populated,
}

/// A transform just added to a pipeline, with the index it can be addressed by
#[derive(Debug, Clone, PartialEq)]
pub struct AppendedTransform {
    pub index: usize,
    pub transform: Transform,
}

impl TryFrom<Vec<Transform>> for TransformPipeline {
    type Error = TraceKitError;

    fn try_from(transforms: Vec<Transform>) -> std::result::Result<Self, Self::Error> {
        let pipeline = Self { transforms };
        pipeline.validate()?;
        Ok(pipeline)
    }
}

impl From<TransformPipeline> for Vec<Transform> {
    fn from(pipeline: TransformPipeline) -> Self {
        pipeline.transforms
    }
}

impl TransformPipeline {
    pub fn new() -> Self {
        Default::default()
    }

    /// Read an engine-shaped transform array. Entries without a `type` are
    /// placeholders the editor never finished and are dropped.
    pub fn from_json(value: &Value) -> Result<Self> {
        let entries = value.as_array().ok_or_else(|| {
            TraceKitError::specification(format!("Expected transform array, received {value}"))
        })?;

        let mut transforms = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let has_type = entry
                .get("type")
                .map(|t| !t.is_null() && t.as_str() != Some(""))
                .unwrap_or(false);
            if !has_type {
                log::warn!("Skipping transform {i} with no type: {entry}");
                continue;
            }
            let transform: Transform = serde_json::from_value(entry.clone())
                .with_context(|| format!("Failed to parse transform {i}"))?;
            transforms.push(transform);
        }
        Self::try_from(transforms)
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Transform> {
        self.transforms.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transform> {
        self.transforms.iter()
    }

    pub fn state(&self) -> PipelineState {
        if self.is_empty() {
            PipelineState::Empty
        } else {
            PipelineState::Populated
        }
    }

    pub fn contains_kind(&self, kind: TransformKind) -> bool {
        self.transforms.iter().any(|tx| tx.kind() == kind)
    }

    /// Kinds the add menu may offer right now: the catalog's kinds for this series
    /// type minus any singleton kind already present
    pub fn insertable_kinds(
        &self,
        catalog: &TransformCatalog,
        series_type: SeriesType,
    ) -> Vec<KindOption> {
        catalog
            .available_kinds(series_type)
            .into_iter()
            .filter(|opt| !(opt.kind.is_singleton() && self.contains_kind(opt.kind)))
            .collect()
    }

    /// Append the default transform of `kind` to the end of the pipeline
    pub fn append(
        &self,
        kind: TransformKind,
        catalog: &TransformCatalog,
        ctx: &SeriesContext,
    ) -> Result<(Self, AppendedTransform)> {
        let insertable = self.insertable_kinds(catalog, ctx.series_type);
        if !insertable.iter().any(|opt| opt.kind == kind) {
            return Err(TraceKitError::invalid_kind(format!(
                "Cannot add {kind} transform to {} series, insertable kinds: [{}]",
                ctx.series_type,
                insertable.iter().map(|opt| opt.kind).join(", ")
            )));
        }

        let transform = catalog.default_payload(kind, ctx);
        let mut transforms = self.transforms.clone();
        transforms.push(transform.clone());
        let pipeline = Self::try_from(transforms)?;

        let index = pipeline.len() - 1;
        log::debug!("Appended {kind} transform at index {index}");
        Ok((pipeline, AppendedTransform { index, transform }))
    }

    /// Apply a partial update to the transform at `index`
    pub fn update(&self, index: usize, patch: &TransformPatch) -> Result<Self> {
        let current = self.checked_get(index)?;
        let updated = current
            .apply_patch(patch)
            .with_context(|| format!("Failed to update transform {index}"))?;
        log::debug!(
            "Updated [{}] of {} transform at index {index}",
            patch.attributes().join(", "),
            updated.kind()
        );
        self.replace(index, updated)
    }

    /// Apply an attribute/value map sent by the edit form
    pub fn update_json(&self, index: usize, patch: &Value) -> Result<Self> {
        let patch: TransformPatch = serde_json::from_value(patch.clone())
            .with_context(|| format!("Invalid patch for transform {index}"))?;
        self.update(index, &patch)
    }

    /// Change the function of one aggregation of the aggregate transform at `index`
    pub fn set_aggregation_func(
        &self,
        index: usize,
        target: &str,
        func: AggregateFunc,
    ) -> Result<Self> {
        let current = self.checked_get(index)?;
        let mut spec = current
            .as_aggregate()
            .ok_or_else(|| {
                TraceKitError::specification(format!(
                    "Transform {index} is a {} transform, not an aggregate",
                    current.kind()
                ))
            })?
            .clone();
        spec.aggregations = spec.aggregations.set_func(target, func)?;
        log::debug!("Set aggregation func of {target} to {} at index {index}", func.name());
        self.replace(index, Transform::Aggregate(spec))
    }

    /// Remove the transform at `index`. Transforms after it shift down by one.
    pub fn remove(&self, index: usize) -> Result<(Self, Transform)> {
        self.checked_get(index)?;
        let mut transforms = self.transforms.clone();
        let removed = transforms.remove(index);
        log::debug!("Removed {} transform at index {index}", removed.kind());
        Ok((Self::try_from(transforms)?, removed))
    }

    /// Check every pipeline invariant: each transform is valid on its own and no
    /// singleton kind appears more than once
    pub fn validate(&self) -> Result<()> {
        for (i, tx) in self.transforms.iter().enumerate() {
            tx.validate()
                .with_context(|| format!("Invalid {} transform at index {i}", tx.kind()))?;
        }

        let repeated: Vec<_> = self
            .transforms
            .iter()
            .map(|tx| tx.kind())
            .filter(|kind| kind.is_singleton())
            .duplicates()
            .collect();
        if !repeated.is_empty() {
            return Err(TraceKitError::specification(format!(
                "At most one transform of each kind [{}] is allowed per pipeline",
                repeated.iter().join(", ")
            )));
        }
        Ok(())
    }

    fn checked_get(&self, index: usize) -> Result<&Transform> {
        self.transforms.get(index).ok_or_else(|| {
            TraceKitError::index_out_of_range(format!(
                "Transform index {index} out of range for pipeline of length {}",
                self.len()
            ))
        })
    }

    fn replace(&self, index: usize, transform: Transform) -> Result<Self> {
        let mut transforms = self.transforms.clone();
        transforms[index] = transform;
        Self::try_from(transforms)
    }
}

impl<'a> IntoIterator for &'a TransformPipeline {
    type Item = &'a Transform;
    type IntoIter = std::slice::Iter<'a, Transform>;

    fn into_iter(self) -> Self::IntoIter {
        self.transforms.iter()
    }
}
