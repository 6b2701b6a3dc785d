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
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracekit_common::error::{Result, TraceKitError};

/// Splits one trace into several, one per distinct value of `groups`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupbyTransformSpec {
    pub groups: Option<Vec<String>>,

    pub groupssrc: Option<String>,

    pub styles: Vec<GroupStyle>,

    pub enabled: bool,
}

impl Default for GroupbyTransformSpec {
    fn default() -> Self {
        Self {
            groups: None,
            groupssrc: None,
            styles: Vec::new(),
            enabled: true,
        }
    }
}

/// Style overrides applied to the trace produced for the group named `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStyle {
    pub target: String,

    #[serde(default)]
    pub value: Value,
}

impl TransformSpecTrait for GroupbyTransformSpec {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn source_reference(&self) -> Option<&str> {
        self.groupssrc.as_deref().filter(|src| !src.is_empty())
    }

    fn validate(&self) -> Result<()> {
        let duplicates: Vec<_> = self
            .styles
            .iter()
            .map(|style| style.target.as_str())
            .duplicates()
            .collect();
        if !duplicates.is_empty() {
            return Err(TraceKitError::specification(format!(
                "Duplicate group style targets: {}",
                duplicates.join(", ")
            )));
        }
        Ok(())
    }
}
