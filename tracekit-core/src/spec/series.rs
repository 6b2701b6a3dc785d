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
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracekit_common::error::TraceKitError;

/// Field most trace types carry their primary values in
pub const DEFAULT_PRIMARY_FIELD: &str = "y";

macro_rules! series_types {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Trace type of the series a pipeline is attached to
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum SeriesType {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl SeriesType {
            pub const ALL: &'static [SeriesType] = &[$(SeriesType::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(SeriesType::$variant => $name,)+
                }
            }
        }
    };
}

series_types! {
    Scatter => "scatter",
    Scattergl => "scattergl",
    Bar => "bar",
    Histogram => "histogram",
    Histogram2d => "histogram2d",
    Histogram2dContour => "histogram2dcontour",
    Box => "box",
    Violin => "violin",
    Ohlc => "ohlc",
    Candlestick => "candlestick",
    Choropleth => "choropleth",
    Scattergeo => "scattergeo",
    Pie => "pie",
    Funnel => "funnel",
    Funnelarea => "funnelarea",
    Waterfall => "waterfall",
    Scatterpolar => "scatterpolar",
    Scatterpolargl => "scatterpolargl",
    Barpolar => "barpolar",
    Scatter3d => "scatter3d",
    Scatterternary => "scatterternary",
    Scattercarpet => "scattercarpet",
    Scattermapbox => "scattermapbox",
    Heatmap => "heatmap",
    Heatmapgl => "heatmapgl",
    Contour => "contour",
    Surface => "surface",
    Mesh3d => "mesh3d",
    Cone => "cone",
    Streamtube => "streamtube",
    Table => "table",
    Sankey => "sankey",
    Parcoords => "parcoords",
    Parcats => "parcats",
    Sunburst => "sunburst",
    Treemap => "treemap",
    Indicator => "indicator",
    Densitymapbox => "densitymapbox",
    Choroplethmapbox => "choroplethmapbox",
    Carpet => "carpet",
    Contourcarpet => "contourcarpet",
    Image => "image",
    Isosurface => "isosurface",
    Volume => "volume",
    Splom => "splom",
    Pointcloud => "pointcloud",
}

impl Display for SeriesType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeriesType {
    type Err = TraceKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeriesType::ALL
            .iter()
            .copied()
            .find(|series_type| series_type.name() == s)
            .ok_or_else(|| TraceKitError::specification(format!("Unknown series type: {s}")))
    }
}

/// What the catalog needs to know about a series to initialize a new transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesContext {
    pub series_type: SeriesType,

    /// Field a fresh aggregate transform targets, `None` when the series has no
    /// primary value field
    pub primary_field: Option<String>,
}

impl SeriesContext {
    pub fn new(series_type: SeriesType) -> Self {
        Self {
            series_type,
            primary_field: Some(DEFAULT_PRIMARY_FIELD.to_string()),
        }
    }

    pub fn with_primary_field<S: Into<String>>(mut self, primary_field: Option<S>) -> Self {
        self.primary_field = primary_field.map(Into::into);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for series_type in SeriesType::ALL {
            assert_eq!(
                series_type.name().parse::<SeriesType>().unwrap(),
                *series_type
            );
            assert_eq!(
                serde_json::to_value(series_type).unwrap(),
                serde_json::Value::String(series_type.to_string())
            );
        }
    }

    #[test]
    fn unknown_name_is_specification_error() {
        assert!(matches!(
            "sparkline".parse::<SeriesType>(),
            Err(TraceKitError::SpecificationError(..))
        ));
    }

    #[test]
    fn context_defaults_to_y() {
        let ctx = SeriesContext::new(SeriesType::Bar);
        assert_eq!(ctx.primary_field.as_deref(), Some("y"));

        let ctx = ctx.with_primary_field(None::<String>);
        assert_eq!(ctx.primary_field, None);
    }
}
