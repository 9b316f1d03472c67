//! Declarative chart descriptions.
//!
//! A `Figure` serializes to the JSON document plotly.js takes in `Plotly.newPlot(el, data, layout)`.
//! Only the attributes the dashboard sets are modelled; unset attributes are omitted so plotly
//! falls back to its own defaults.

use crate::model::Amount;
use serde::Serialize;

/// The colour plotly uses for the first trace of a chart.
pub const DEFAULT_COLOR: &str = "#636efa";

/// The continuous colour scale used for value-keyed bar colours.
pub const VIRIDIS: &str = "Viridis";

/// A chart: its traces plus the layout they are drawn in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    data: Vec<Trace>,
    layout: Layout,
}

impl Figure {
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self { data, layout }
    }

    pub fn data(&self) -> &[Trace] {
        &self.data
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The chart title.
    pub fn title(&self) -> &str {
        self.layout.title.text.as_str()
    }
}

/// Values along one dimension of a trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Data {
    Labels(Vec<String>),
    Amounts(Vec<Amount>),
    Counts(Vec<usize>),
    Years(Vec<i32>),
}

impl Data {
    pub fn len(&self) -> usize {
        match self {
            Data::Labels(v) => v.len(),
            Data::Amounts(v) => v.len(),
            Data::Counts(v) => v.len(),
            Data::Years(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self) -> Option<&[String]> {
        match self {
            Data::Labels(v) => Some(v),
            _ => None,
        }
    }

    pub fn amounts(&self) -> Option<&[Amount]> {
        match self {
            Data::Amounts(v) => Some(v),
            _ => None,
        }
    }

    pub fn counts(&self) -> Option<&[usize]> {
        match self {
            Data::Counts(v) => Some(v),
            _ => None,
        }
    }

    pub fn years(&self) -> Option<&[i32]> {
        match self {
            Data::Years(v) => Some(v),
            _ => None,
        }
    }
}

/// One plotly trace. The variant decides the `type` attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(Bar),
    Box(BoxTrace),
    Pie(Pie),
    Scatter(Scatter),
}

impl Trace {
    pub fn kind(&self) -> &'static str {
        match self {
            Trace::Bar(_) => "bar",
            Trace::Box(_) => "box",
            Trace::Pie(_) => "pie",
            Trace::Scatter(_) => "scatter",
        }
    }

    pub fn as_bar(&self) -> Option<&Bar> {
        match self {
            Trace::Bar(bar) => Some(bar),
            _ => None,
        }
    }

    pub fn as_box(&self) -> Option<&BoxTrace> {
        match self {
            Trace::Box(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_pie(&self) -> Option<&Pie> {
        match self {
            Trace::Pie(pie) => Some(pie),
            _ => None,
        }
    }

    pub fn as_scatter(&self) -> Option<&Scatter> {
        match self {
            Trace::Scatter(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    #[serde(rename = "v")]
    Vertical,
    #[serde(rename = "h")]
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub x: Data,
    pub y: Data,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    pub marker: Marker,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxTrace {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Data>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Data>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxpoints: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoveron: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<&'static str>,
    pub marker: Marker,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pie {
    pub labels: Vec<String>,
    pub values: Vec<Amount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    pub x: Data,
    pub y: Data,
    pub mode: &'static str,
    pub line: Line,
    pub showlegend: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<&'static str>,
}

impl Marker {
    /// A marker in one fixed colour.
    pub fn solid(color: &'static str) -> Self {
        Self {
            color: Some(Color::Solid(color)),
            ..Default::default()
        }
    }
}

/// A single colour, or one value per point mapped through `colorscale`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Color {
    Solid(&'static str),
    Scale(Data),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showticklabels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Some(Title::new(text)),
            ..Default::default()
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().map(|t| t.text.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bargap: Option<f64>,
}

impl Layout {
    /// A single-plot layout with a title and both axis titles.
    pub fn titled(title: &str, x: &str, y: &str) -> Self {
        Self {
            title: Title::new(title),
            xaxis: Axis::titled(x),
            yaxis: Axis::titled(y),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bar_serializes_as_plotly_trace() {
        let trace = Trace::Bar(Bar {
            x: Data::Labels(vec!["A".into()]),
            y: Data::Counts(vec![3]),
            orientation: Orientation::Vertical,
            text: None,
            textposition: None,
            width: None,
            hovertext: None,
            marker: Marker::solid(DEFAULT_COLOR),
            showlegend: false,
        });
        assert_eq!(
            serde_json::to_value(&trace).unwrap(),
            json!({
                "type": "bar",
                "x": ["A"],
                "y": [3],
                "orientation": "v",
                "marker": {"color": "#636efa"},
                "showlegend": false,
            })
        );
    }

    #[test]
    fn test_layout_omits_unset_attributes() {
        let layout = Layout::titled("T", "X", "Y");
        assert_eq!(
            serde_json::to_value(&layout).unwrap(),
            json!({
                "title": {"text": "T"},
                "xaxis": {"title": {"text": "X"}},
                "yaxis": {"title": {"text": "Y"}},
            })
        );
    }

    #[test]
    fn test_figure_title() {
        let figure = Figure::new(vec![], Layout::titled("Chart", "x", "y"));
        assert_eq!(figure.title(), "Chart");
        assert!(figure.data().is_empty());
    }
}
