use crate::catalog::{KindOption, TransformCatalog};
use crate::label::LabelResolver;
use crate::pipeline::{AppendedTransform, TransformPipeline};
use crate::spec::data_source::DataSourceOptions;
use crate::spec::series::SeriesContext;
use crate::spec::transform::aggregate::{AggregateFunc, Aggregation};
use crate::spec::transform::patch::TransformPatch;
use crate::spec::transform::TransformKind;
use serde::{Deserialize, Serialize};
use tracekit_common::error::{Result, ResultWithContext};

/// Edit requests the form sends for one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditRequest {
    Add {
        kind: TransformKind,
    },
    Update {
        index: usize,
        patch: TransformPatch,
    },
    SetAggregationFunc {
        index: usize,
        target: String,
        func: AggregateFunc,
    },
    Remove {
        index: usize,
    },
}

/// What the form renders for one transform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldSnapshot {
    pub index: usize,
    pub label: String,
    pub kind: TransformKind,
    pub enabled: bool,
    pub attributes: &'static [&'static str],

    /// Aggregation the form exposes for editing. Only the first editable entry is
    /// shown; the aggregate transform itself may hold more.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub folds: Vec<FoldSnapshot>,
    pub add_options: Vec<KindOption>,

    /// Kinds to describe in the empty-panel message, empty once a transform exists
    pub help_topics: Vec<TransformKind>,
}

/// Transform editing state of a single trace.
///
/// Edits produce a new panel and leave `self` untouched; the caller decides when
/// the returned value replaces the one it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformPanel {
    series: SeriesContext,
    pipeline: TransformPipeline,
    catalog: TransformCatalog,
}

impl TransformPanel {
    pub fn new(series: SeriesContext, catalog: TransformCatalog) -> Self {
        Self::with_pipeline(series, TransformPipeline::new(), catalog)
    }

    pub fn with_pipeline(
        series: SeriesContext,
        pipeline: TransformPipeline,
        catalog: TransformCatalog,
    ) -> Self {
        Self {
            series,
            pipeline,
            catalog,
        }
    }

    pub fn series(&self) -> &SeriesContext {
        &self.series
    }

    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    pub fn catalog(&self) -> &TransformCatalog {
        &self.catalog
    }

    pub fn add_options(&self) -> Vec<KindOption> {
        self.pipeline
            .insertable_kinds(&self.catalog, self.series.series_type)
    }

    pub fn snapshot(&self, options: &DataSourceOptions) -> PanelSnapshot {
        let resolver = LabelResolver::new(options);
        let folds = self
            .pipeline
            .iter()
            .enumerate()
            .map(|(index, tx)| FoldSnapshot {
                index,
                label: resolver.label_for(tx, index),
                kind: tx.kind(),
                enabled: tx.enabled(),
                attributes: tx.kind().attributes(),
                aggregation: tx
                    .as_aggregate()
                    .and_then(|spec| spec.aggregations.first_editable().cloned()),
            })
            .collect();

        let help_topics = if self.pipeline.is_empty() {
            self.catalog.help_topics(self.series.series_type)
        } else {
            Vec::new()
        };

        PanelSnapshot {
            folds,
            add_options: self.add_options(),
            help_topics,
        }
    }

    pub fn add(&self, kind: TransformKind) -> Result<(Self, AppendedTransform)> {
        let (pipeline, appended) = self.pipeline.append(kind, &self.catalog, &self.series)?;
        Ok((self.with(pipeline), appended))
    }

    pub fn apply(&self, request: &EditRequest) -> Result<Self> {
        let pipeline = match request {
            EditRequest::Add { kind } => return Ok(self.add(*kind)?.0),
            EditRequest::Update { index, patch } => self.pipeline.update(*index, patch),
            EditRequest::SetAggregationFunc {
                index,
                target,
                func,
            } => self.pipeline.set_aggregation_func(*index, target, *func),
            EditRequest::Remove { index } => self.pipeline.remove(*index).map(|(p, _)| p),
        }
        .with_context(|| format!("Failed to apply edit request {request:?}"))?;
        Ok(self.with(pipeline))
    }

    fn with(&self, pipeline: TransformPipeline) -> Self {
        Self {
            series: self.series.clone(),
            pipeline,
            catalog: self.catalog.clone(),
        }
    }
}
