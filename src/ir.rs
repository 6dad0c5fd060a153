//! Chart description handed from the layout engine to a rendering backend.
//!
//! All coordinates are in data space: x in group-slot units (slot i is
//! centred on x = i), y in the units of the observations.

use serde::Serialize;

/// RGB color as an 8-bit triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<plotters::style::RGBColor> for Rgb {
    fn from(c: plotters::style::RGBColor) -> Self {
        Rgb(c.0, c.1, c.2)
    }
}

impl From<Rgb> for plotters::style::RGBColor {
    fn from(c: Rgb) -> Self {
        plotters::style::RGBColor(c.0, c.1, c.2)
    }
}

/// Everything a backend needs to draw the chart; no hidden state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescription {
    /// Canvas size in pixels.
    pub width: u32,
    pub height: u32,
    pub title: TextSpec,
    pub bars: Vec<BarGeometry>,
    pub bar_style: BarStyle,
    pub scatter: Option<ScatterLayer>,
    pub error_bars: Option<ErrorBarLayer>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    /// Stroke width of the frame around the plotting area, in points.
    pub axis_line_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpec {
    pub text: String,
    /// Font size in points.
    pub font_size: f64,
}

/// One bar: spans `[left, right]` horizontally and `[0, top]` vertically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub group_index: usize,
    pub label: String,
    pub center: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarStyle {
    pub fill: Rgb,
    pub edge: Rgb,
    /// Edge stroke width in points.
    pub edge_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub group_index: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterLayer {
    pub points: Vec<ScatterPoint>,
    /// Marker area in square points.
    pub size: f64,
    pub fill: Rgb,
    pub edge: Rgb,
}

/// Which dispersion measure the error bars show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dispersion {
    StdDev,
    StdErr,
}

/// A vertical span centred on a group's mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSpan {
    pub group_index: usize,
    pub x: f64,
    pub center: f64,
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBarLayer {
    pub kind: Dispersion,
    pub spans: Vec<ErrorSpan>,
    pub color: Rgb,
    /// Line width in points.
    pub line_width: f64,
}

/// How an axis range was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeMode {
    /// Fitted to the emitted geometry.
    Auto,
    /// Taken verbatim from the configuration; geometry outside is clipped.
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub label: TextSpec,
    pub min: f64,
    pub max: f64,
    pub mode: RangeMode,
    pub ticks: Vec<Tick>,
    /// Tick label font size in points.
    pub tick_font_size: f64,
}

impl AxisSpec {
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}
