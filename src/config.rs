//! Chart configuration: every cosmetic and statistical knob for one render.

use crate::error::{ChartError, Result};
use crate::style::parse_color;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, RangeInclusive};
use std::path::Path;

/// User-facing chart settings. JSON keys are camelCase (`yTickInterval`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,

    pub title_font_size: f64,
    pub x_label_font_size: f64,
    pub y_label_font_size: f64,
    pub x_tick_font_size: f64,
    pub y_tick_font_size: f64,

    pub error_bar_line_width: f64,
    pub bar_width: f64,

    pub auto_y_lim: bool,
    pub y_min: f64,
    pub y_max: f64,
    pub y_tick_interval: f64,

    pub jitter_range: f64,
    pub scatter_size: f64,
    pub aspect_ratio: f64,
    pub axis_line_width: f64,
    pub bar_edge_width: f64,
    pub x_margin: f64,

    pub show_scatter: bool,
    pub show_error_bars: bool,
    pub show_std_err: bool,

    pub bar_color: String,
    pub bar_edge_color: String,
    pub scatter_color: String,
    pub scatter_edge_color: String,
    pub error_bar_color: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Group means with individual data".to_string(),
            x_label: "Group".to_string(),
            y_label: "Value".to_string(),
            title_font_size: 20.0,
            x_label_font_size: 16.0,
            y_label_font_size: 16.0,
            x_tick_font_size: 16.0,
            y_tick_font_size: 16.0,
            error_bar_line_width: 1.0,
            bar_width: 0.5,
            auto_y_lim: true,
            y_min: 0.0,
            y_max: 100.0,
            y_tick_interval: 5.0,
            jitter_range: 0.2,
            scatter_size: 50.0,
            aspect_ratio: 1.0,
            axis_line_width: 1.0,
            bar_edge_width: 1.0,
            x_margin: 0.2,
            show_scatter: true,
            show_error_bars: true,
            show_std_err: false,
            bar_color: "#ADD8E6".to_string(),
            bar_edge_color: "black".to_string(),
            scatter_color: "black".to_string(),
            scatter_edge_color: "black".to_string(),
            error_bar_color: "black".to_string(),
        }
    }
}

const FONT_SIZE: RangeInclusive<f64> = 8.0..=24.0;
const TITLE_FONT_SIZE: RangeInclusive<f64> = 8.0..=48.0;
const LINE_WIDTH: RangeInclusive<f64> = 0.5..=5.0;
const BAR_WIDTH: RangeInclusive<f64> = 0.1..=1.0;
const JITTER_RANGE: RangeInclusive<f64> = 0.0..=0.5;
const SCATTER_SIZE: RangeInclusive<f64> = 10.0..=200.0;
const ASPECT_RATIO: RangeInclusive<f64> = 0.5..=2.0;
const X_MARGIN: RangeInclusive<f64> = 0.0..=1.0;

impl ChartConfig {
    /// Parse a JSON configuration document; omitted keys keep their defaults.
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Accept this configuration for rendering.
    ///
    /// All structural checks happen here so that layout never has to fail.
    pub fn validate(self) -> Result<ValidatedConfig> {
        check_range("titleFontSize", self.title_font_size, TITLE_FONT_SIZE)?;
        check_range("xLabelFontSize", self.x_label_font_size, FONT_SIZE)?;
        check_range("yLabelFontSize", self.y_label_font_size, FONT_SIZE)?;
        check_range("xTickFontSize", self.x_tick_font_size, FONT_SIZE)?;
        check_range("yTickFontSize", self.y_tick_font_size, FONT_SIZE)?;
        check_range("errorBarLineWidth", self.error_bar_line_width, LINE_WIDTH)?;
        check_range("barWidth", self.bar_width, BAR_WIDTH)?;
        check_range("jitterRange", self.jitter_range, JITTER_RANGE)?;
        check_range("scatterSize", self.scatter_size, SCATTER_SIZE)?;
        check_range("aspectRatio", self.aspect_ratio, ASPECT_RATIO)?;
        check_range("axisLineWidth", self.axis_line_width, LINE_WIDTH)?;
        check_range("barEdgeWidth", self.bar_edge_width, LINE_WIDTH)?;
        check_range("xMargin", self.x_margin, X_MARGIN)?;

        if !(self.y_tick_interval.is_finite() && self.y_tick_interval > 0.0) {
            return Err(ChartError::config(format!(
                "yTickInterval must be a positive number, got {}",
                self.y_tick_interval
            )));
        }

        if !self.auto_y_lim {
            if !self.y_min.is_finite() || !self.y_max.is_finite() {
                return Err(ChartError::config("yMin and yMax must be finite numbers"));
            }
            if self.y_min >= self.y_max {
                return Err(ChartError::config(format!(
                    "yMin ({}) must be less than yMax ({})",
                    self.y_min, self.y_max
                )));
            }
        }

        let colors = Palette {
            bar: resolve_color("barColor", &self.bar_color)?,
            bar_edge: resolve_color("barEdgeColor", &self.bar_edge_color)?,
            scatter: resolve_color("scatterColor", &self.scatter_color)?,
            scatter_edge: resolve_color("scatterEdgeColor", &self.scatter_edge_color)?,
            error_bar: resolve_color("errorBarColor", &self.error_bar_color)?,
        };

        Ok(ValidatedConfig {
            config: self,
            colors,
        })
    }
}

fn check_range(name: &str, value: f64, bounds: RangeInclusive<f64>) -> Result<()> {
    if bounds.contains(&value) {
        Ok(())
    } else {
        Err(ChartError::config(format!(
            "{} must be between {} and {}, got {}",
            name,
            bounds.start(),
            bounds.end(),
            value
        )))
    }
}

fn resolve_color(name: &str, value: &str) -> Result<RGBColor> {
    parse_color(value)
        .ok_or_else(|| ChartError::config(format!("{} is not a recognised color: '{}'", name, value)))
}

/// Colors resolved at acceptance time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bar: RGBColor,
    pub bar_edge: RGBColor,
    pub scatter: RGBColor,
    pub scatter_edge: RGBColor,
    pub error_bar: RGBColor,
}

/// A configuration snapshot that passed [`ChartConfig::validate`].
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    config: ChartConfig,
    colors: Palette,
}

impl ValidatedConfig {
    pub fn colors(&self) -> &Palette {
        &self.colors
    }

    pub fn into_inner(self) -> ChartConfig {
        self.config
    }
}

impl Deref for ValidatedConfig {
    type Target = ChartConfig;

    fn deref(&self) -> &ChartConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = ChartConfig::default().validate().unwrap();
        assert_eq!(cfg.y_tick_interval, 5.0);
        assert_eq!(cfg.colors().bar, RGBColor(173, 216, 230));
        assert!(cfg.show_error_bars && !cfg.show_std_err);
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let cfg = ChartConfig {
            y_tick_interval: 0.0,
            ..ChartConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ChartError::Configuration(_)));
        assert!(err.to_string().contains("yTickInterval"));
    }

    #[test]
    fn test_negative_and_nan_tick_interval_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let cfg = ChartConfig {
                y_tick_interval: bad,
                ..ChartConfig::default()
            };
            assert!(cfg.validate().is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_bounds_checked() {
        let cfg = ChartConfig {
            jitter_range: 0.6,
            ..ChartConfig::default()
        };
        assert!(cfg.validate().unwrap_err().to_string().contains("jitterRange"));

        let cfg = ChartConfig {
            x_tick_font_size: 30.0,
            ..ChartConfig::default()
        };
        assert!(cfg.validate().unwrap_err().to_string().contains("xTickFontSize"));
    }

    #[test]
    fn test_fixed_limits_must_be_ordered() {
        let cfg = ChartConfig {
            auto_y_lim: false,
            y_min: 10.0,
            y_max: 10.0,
            ..ChartConfig::default()
        };
        assert!(cfg.validate().is_err());

        // ignored while auto-scaling
        let cfg = ChartConfig {
            auto_y_lim: true,
            y_min: 10.0,
            y_max: 0.0,
            ..ChartConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_bad_color_rejected() {
        let cfg = ChartConfig {
            bar_edge_color: "not-a-color".to_string(),
            ..ChartConfig::default()
        };
        assert!(cfg.validate().unwrap_err().to_string().contains("barEdgeColor"));
    }

    #[test]
    fn test_json_uses_camel_case_and_defaults() {
        let cfg = ChartConfig::from_json_str(
            r#"{"title": "Scores", "yTickInterval": 2.5, "autoYLim": false, "yMax": 10}"#,
        )
        .unwrap();
        assert_eq!(cfg.title, "Scores");
        assert_eq!(cfg.y_tick_interval, 2.5);
        assert!(!cfg.auto_y_lim);
        assert_eq!(cfg.y_max, 10.0);
        assert_eq!(cfg.bar_width, 0.5);
    }

    #[test]
    fn test_json_unknown_key_rejected() {
        assert!(ChartConfig::from_json_str(r#"{"yTicks": 2}"#).is_err());
    }
}
