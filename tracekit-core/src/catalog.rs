use crate::config::CatalogConfig;
use crate::spec::series::{SeriesContext, SeriesType};
use crate::spec::transform::aggregate::{AggregateTransformSpec, Aggregation, AggregationSet};
use crate::spec::transform::filter::FilterTransformSpec;
use crate::spec::transform::groupby::GroupbyTransformSpec;
use crate::spec::transform::sort::SortTransformSpec;
use crate::spec::transform::{Transform, TransformKind};
use serde::Serialize;
use tracekit_common::error::Result;

/// Entry of the add-transform menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindOption {
    pub kind: TransformKind,
    pub label: &'static str,
}

impl From<TransformKind> for KindOption {
    fn from(kind: TransformKind) -> Self {
        Self {
            kind,
            label: kind.label(),
        }
    }
}

/// Static knowledge about which transform kinds apply to which series types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformCatalog {
    config: CatalogConfig,
}

impl TransformCatalog {
    pub fn try_new(config: CatalogConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Candlesticks are transformable in the engine but a split or sort breaks
    /// their rendering, so they only get the restricted menu
    pub fn is_fully_transformable(&self, series_type: SeriesType) -> bool {
        self.config.transformable_types.contains(&series_type)
            && series_type != SeriesType::Candlestick
    }

    pub fn is_split_allowed(&self, series_type: SeriesType) -> bool {
        self.config.split_allowed_types.contains(&series_type)
    }

    /// Kinds legal for `series_type`, in catalog order
    pub fn available_kinds(&self, series_type: SeriesType) -> Vec<KindOption> {
        let fully_transformable = self.is_fully_transformable(series_type);
        TransformKind::ALL
            .into_iter()
            .filter(|kind| {
                fully_transformable
                    || match kind {
                        TransformKind::Filter | TransformKind::Aggregate => true,
                        TransformKind::Groupby => self.is_split_allowed(series_type),
                        TransformKind::Sort => false,
                    }
            })
            .map(KindOption::from)
            .collect()
    }

    /// Zero-state transform of `kind` for the series described by `ctx`
    pub fn default_payload(&self, kind: TransformKind, ctx: &SeriesContext) -> Transform {
        match kind {
            TransformKind::Filter => Transform::Filter(FilterTransformSpec::default()),
            TransformKind::Groupby => Transform::Groupby(GroupbyTransformSpec::default()),
            TransformKind::Aggregate => {
                let aggregations = match &ctx.primary_field {
                    Some(field) if !field.is_empty() => AggregationSet::single(Aggregation::new(
                        field.clone(),
                        self.config.default_aggregate_func,
                    )),
                    _ => AggregationSet::default(),
                };
                Transform::Aggregate(AggregateTransformSpec {
                    aggregations,
                    enabled: true,
                })
            }
            TransformKind::Sort => Transform::Sort(SortTransformSpec::default()),
        }
    }

    /// Kinds described to the user while a trace has no transforms yet
    pub fn help_topics(&self, series_type: SeriesType) -> Vec<TransformKind> {
        let mut topics = vec![TransformKind::Filter, TransformKind::Aggregate];
        if self.is_fully_transformable(series_type) {
            topics.extend([TransformKind::Groupby, TransformKind::Sort]);
        }
        if self.is_split_allowed(series_type) {
            topics.push(TransformKind::Groupby);
        }
        topics.sort();
        topics.dedup();
        topics
    }
}
