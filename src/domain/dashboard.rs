// Dashboard domain model
use super::time_series::{Provenance, YearPoint, YearRange};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    /// Widest year span available to the range slider.
    pub year_bounds: Option<YearRange>,
    /// Range actually applied to the charts.
    pub range: Option<YearRange>,
    pub charts: Vec<ChartData>,
    pub bar_charts: Vec<BarChartData>,
    pub notes: Vec<Note>,
    /// Data-quality disclosures, one per series served from fallback data.
    pub notices: Vec<String>,
}

impl Dashboard {
    pub fn new(title: String, year_bounds: Option<YearRange>, range: Option<YearRange>) -> Self {
        Self {
            title,
            year_bounds,
            range,
            charts: Vec::new(),
            bar_charts: Vec::new(),
            notes: Vec::new(),
            notices: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    DualAxis,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub axis: Axis,
    pub provenance: Provenance,
    pub points: Vec<YearPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub x_title: String,
    pub y_title: String,
    pub y2_title: Option<String>,
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarChartData {
    pub id: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub heading: String,
    pub body: String,
}
