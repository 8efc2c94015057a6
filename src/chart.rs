use serde::Serialize;

/// Chart kinds produced by the reports
///
/// This enum names the visual form of a chart independently of the
/// traces that make it up, so clients can dispatch without inspecting
/// the trace list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Vertical bars, one per category
    Bar,

    /// Bars laid out along the y axis
    HorizontalBar,

    /// Slices of a whole, optionally with a hole in the middle
    Pie,

    /// Frequency distribution of raw numeric samples
    Histogram,

    /// Points joined in x order
    Line,

    /// Matrix of values shaded by magnitude
    Heatmap,
}

/// Chart description sent to the dashboard
///
/// Serializes to `{"kind": ..., "data": [...], "layout": {...}}`. The
/// `data` and `layout` members follow the Plotly figure format so the
/// front end can hand them straight to `Plotly.newPlot`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Chart {
    pub fn new(kind: ChartKind, layout: Layout) -> Self {
        Chart {
            kind,
            data: Vec::new(),
            layout,
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.data.push(trace);
        self
    }
}

/// Axis values: category names or numbers
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Values {
    Text(Vec<String>),
    Numbers(Vec<f64>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Text(v) => v.len(),
            Values::Numbers(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            Values::Text(v) => Some(v),
            Values::Numbers(_) => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Values::Numbers(v) => Some(v),
            Values::Text(_) => None,
        }
    }
}

/// A single data series
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Pie(PieTrace),
    Histogram(HistogramTrace),
    /// Plotly draws lines with its scatter trace
    #[serde(rename = "scatter")]
    Line(LineTrace),
    Heatmap(HeatmapTrace),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Values,
    pub y: Values,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
}

impl BarTrace {
    /// Categories on x, values on y
    pub fn vertical(categories: Vec<String>, values: Vec<f64>) -> Self {
        BarTrace {
            x: Values::Text(categories),
            y: Values::Numbers(values),
            orientation: None,
            name: None,
            marker: None,
            text: None,
            textposition: None,
        }
    }

    /// Values on x, categories on y
    pub fn horizontal(categories: Vec<String>, values: Vec<f64>) -> Self {
        BarTrace {
            x: Values::Numbers(values),
            y: Values::Text(categories),
            orientation: Some("h"),
            ..BarTrace::vertical(Vec::new(), Vec::new())
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Some("h")
    }

    pub fn categories(&self) -> &[String] {
        let axis = if self.is_horizontal() { &self.y } else { &self.x };
        axis.as_text().unwrap_or_default()
    }

    pub fn values(&self) -> &[f64] {
        let axis = if self.is_horizontal() { &self.x } else { &self.y };
        axis.as_numbers().unwrap_or_default()
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Label each bar with the given text, placed automatically
    pub fn labels(mut self, text: Vec<String>) -> Self {
        self.text = Some(text);
        self.textposition = Some("auto");
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub hole: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    pub textinfo: &'static str,
    pub textfont: Font,
}

impl PieTrace {
    pub fn new(labels: Vec<String>, values: Vec<f64>, hole: f64) -> Self {
        PieTrace {
            labels,
            values,
            hole,
            marker: None,
            textinfo: "label+percent+value",
            textfont: Font { size: 14 },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramTrace {
    pub x: Vec<f64>,
    pub name: String,
    pub marker: Marker,
    pub opacity: f64,
    /// Upper bound on the number of bins
    pub nbinsx: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineTrace {
    pub x: Values,
    pub y: Vec<f64>,
    pub mode: &'static str,
    pub line: LineStyle,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeatmapTrace {
    pub z: Vec<Vec<u32>>,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub colorscale: &'static str,
    pub text: Vec<Vec<u32>>,
    pub texttemplate: &'static str,
    pub textfont: Font,
    pub colorbar: ColorBar,
}

/// Marker styling shared by the trace kinds
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    /// Per-slice colors, used by pie traces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl Marker {
    pub fn solid(color: &str) -> Self {
        Marker {
            color: Some(MarkerColor::Solid(color.to_string())),
            ..Marker::default()
        }
    }

    pub fn per_point(colors: &[&str]) -> Self {
        Marker {
            color: Some(MarkerColor::PerPoint(
                colors.iter().map(|c| c.to_string()).collect(),
            )),
            ..Marker::default()
        }
    }

    pub fn slices(colors: &[&str]) -> Self {
        Marker {
            colors: Some(colors.iter().map(|c| c.to_string()).collect()),
            ..Marker::default()
        }
    }

    /// Shade each point by its value on a named color scale
    pub fn scaled(values: Vec<f64>, colorscale: &'static str) -> Self {
        Marker {
            color: Some(MarkerColor::Scale(values)),
            colorscale: Some(colorscale),
            ..Marker::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Solid(String),
    PerPoint(Vec<String>),
    Scale(Vec<f64>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

impl ColorBar {
    pub fn titled(text: &str) -> Self {
        ColorBar {
            title: Title::new(text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: &str) -> Self {
        Title {
            text: text.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

/// Figure-level options
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    pub template: &'static str,
    pub height: u32,
    pub font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
}

impl Layout {
    /// 400px tall, 12pt font, white template
    pub fn new(title: &str) -> Self {
        Layout {
            title: Title::new(title),
            xaxis: None,
            yaxis: None,
            template: "plotly_white",
            height: 400,
            font: Font { size: 12 },
            showlegend: None,
            barmode: None,
        }
    }

    pub fn axes(mut self, x_title: &str, y_title: &str) -> Self {
        self.xaxis = Some(Axis {
            title: Title::new(x_title),
        });
        self.yaxis = Some(Axis {
            title: Title::new(y_title),
        });
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font = Font { size };
        self
    }

    pub fn hide_legend(mut self) -> Self {
        self.showlegend = Some(false);
        self
    }

    pub fn overlay(mut self) -> Self {
        self.barmode = Some("overlay");
        self
    }

    pub fn x_title(&self) -> &str {
        self.xaxis.as_ref().map(|a| a.title.text.as_str()).unwrap_or("")
    }

    pub fn y_title(&self) -> &str {
        self.yaxis.as_ref().map(|a| a.title.text.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bar_chart_serializes_as_plotly_figure() {
        let chart = Chart::new(
            ChartKind::Bar,
            Layout::new("Wins").axes("Team", "Number of Wins").hide_legend(),
        )
        .with_trace(Trace::Bar(
            BarTrace::vertical(vec!["A".into(), "B".into()], vec![3.0, 1.0])
                .marker(Marker::solid("#00a8cc"))
                .labels(vec!["3".into(), "1".into()]),
        ));

        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["kind"], "bar");
        assert_eq!(value["data"][0]["type"], "bar");
        assert_eq!(value["data"][0]["x"], json!(["A", "B"]));
        assert_eq!(value["data"][0]["y"], json!([3.0, 1.0]));
        assert_eq!(value["data"][0]["marker"], json!({"color": "#00a8cc"}));
        assert!(value["data"][0].get("orientation").is_none());
        assert_eq!(value["layout"]["xaxis"]["title"]["text"], "Team");
        assert_eq!(value["layout"]["showlegend"], false);
        assert_eq!(value["layout"]["template"], "plotly_white");
    }

    #[test]
    fn horizontal_bar_swaps_axes() {
        let trace = BarTrace::horizontal(vec!["A".into()], vec![50.0]);
        assert_eq!(trace.categories(), ["A".to_string()]);
        assert_eq!(trace.values(), [50.0]);

        let value = serde_json::to_value(Trace::Bar(trace)).unwrap();
        assert_eq!(value["orientation"], "h");
        assert_eq!(value["y"], json!(["A"]));
    }

    #[test]
    fn line_trace_uses_scatter_type() {
        let trace = Trace::Line(LineTrace {
            x: Values::Text(vec!["2025-04-11".into()]),
            y: vec![1.0],
            mode: "lines+markers",
            line: LineStyle {
                color: "#00a8cc".into(),
                width: 2,
            },
            marker: Marker {
                size: Some(6),
                ..Marker::default()
            },
            fill: Some("tozeroy"),
            fillcolor: None,
        });
        let value = serde_json::to_value(trace).unwrap();
        assert_eq!(value["type"], "scatter");
        assert_eq!(value["marker"], json!({"size": 6}));
    }
}
