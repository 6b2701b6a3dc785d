use crate::spec::series::SeriesType;
use crate::spec::transform::aggregate::AggregateFunc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracekit_common::error::{Result, ResultWithContext, TraceKitError};

lazy_static! {
    /// Trace types the charting engine can filter, split, aggregate and sort
    pub static ref TRANSFORMABLE_TYPES: HashSet<SeriesType> = vec![
        SeriesType::Scatter,
        SeriesType::Bar,
        SeriesType::Scattergl,
        SeriesType::Histogram,
        SeriesType::Histogram2d,
        SeriesType::Box,
        SeriesType::Violin,
        SeriesType::Ohlc,
        SeriesType::Candlestick,
        SeriesType::Choropleth,
        SeriesType::Scattergeo,
    ]
    .into_iter()
    .collect();

    /// Trace types that support a split even though they aren't fully transformable
    pub static ref SPLIT_ALLOWED_TYPES: HashSet<SeriesType> = vec![
        SeriesType::Pie,
        SeriesType::Funnel,
        SeriesType::Funnelarea,
        SeriesType::Waterfall,
        SeriesType::Scatterpolar,
        SeriesType::Barpolar,
        SeriesType::Scatter3d,
    ]
    .into_iter()
    .collect();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub transformable_types: HashSet<SeriesType>,
    pub split_allowed_types: HashSet<SeriesType>,

    /// Function given to the initial aggregation of a new aggregate transform
    pub default_aggregate_func: AggregateFunc,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            transformable_types: TRANSFORMABLE_TYPES.clone(),
            split_allowed_types: SPLIT_ALLOWED_TYPES.clone(),
            default_aggregate_func: AggregateFunc::First,
        }
    }
}

impl CatalogConfig {
    /// Parse a config from JSON, falling back to defaults for omitted keys
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(s).with_context(|| "Failed to parse catalog config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // A type belongs to at most one of the two sets
        let mut overlap: Vec<_> = self
            .transformable_types
            .intersection(&self.split_allowed_types)
            .map(|series_type| series_type.name())
            .collect();
        if !overlap.is_empty() {
            overlap.sort();
            return Err(TraceKitError::specification(format!(
                "Series types listed as both transformable and split-allowed: {}",
                overlap.join(", ")
            )));
        }
        Ok(())
    }
}
