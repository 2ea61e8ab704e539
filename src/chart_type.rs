use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartType {
    LineChart,
    ScatterPlot,
    DiscreteBar,
    StackedDiscreteBar,
    StackedBar,
    StackedArea,
    SlopeChart,
    Marimekko,
    WorldMap,
}

impl ChartType {
    /// Types stored in the `charts.type` column. `WorldMap` is a tab, not a type.
    pub const GRAPHER: [ChartType; 8] = [
        ChartType::LineChart,
        ChartType::ScatterPlot,
        ChartType::DiscreteBar,
        ChartType::StackedDiscreteBar,
        ChartType::StackedBar,
        ChartType::StackedArea,
        ChartType::SlopeChart,
        ChartType::Marimekko,
    ];

    pub const ALL: [ChartType; 9] = [
        ChartType::LineChart,
        ChartType::ScatterPlot,
        ChartType::DiscreteBar,
        ChartType::StackedDiscreteBar,
        ChartType::StackedBar,
        ChartType::StackedArea,
        ChartType::SlopeChart,
        ChartType::Marimekko,
        ChartType::WorldMap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::LineChart => "LineChart",
            ChartType::ScatterPlot => "ScatterPlot",
            ChartType::DiscreteBar => "DiscreteBar",
            ChartType::StackedDiscreteBar => "StackedDiscreteBar",
            ChartType::StackedBar => "StackedBar",
            ChartType::StackedArea => "StackedArea",
            ChartType::SlopeChart => "SlopeChart",
            ChartType::Marimekko => "Marimekko",
            ChartType::WorldMap => "WorldMap",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartType::LineChart => "Line Chart",
            ChartType::ScatterPlot => "Scatter Plot",
            ChartType::DiscreteBar => "Discrete Bar Chart",
            ChartType::StackedDiscreteBar => "Stacked Discrete Bar Chart",
            ChartType::StackedBar => "Stacked Bar Chart",
            ChartType::StackedArea => "Stacked Area Chart",
            ChartType::SlopeChart => "Slope Chart",
            ChartType::Marimekko => "Marimekko Chart",
            ChartType::WorldMap => "World Map",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}
