//! Chart layout: turns per-group samples and a validated configuration into
//! a [`ChartDescription`].
//!
//! Layout is a pure function of its inputs except for the horizontal jitter
//! of scatter points, which is drawn from the supplied random source. Pass a
//! seeded RNG to [`layout_with_rng`] for reproducible output.

use crate::aggregate::GroupSample;
use crate::config::ValidatedConfig;
use crate::ir::{
    AxisSpec, BarGeometry, BarStyle, ChartDescription, Dispersion, ErrorBarLayer, ErrorSpan,
    RangeMode, ScatterLayer, ScatterPoint, TextSpec,
};
use crate::scale::{self, Extent};
use crate::style::figure_size_px;
use rand::Rng;

/// Lay out the chart, jittering scatter points with the thread-local RNG.
pub fn layout(groups: &[GroupSample], config: &ValidatedConfig) -> ChartDescription {
    layout_with_rng(groups, config, &mut rand::rng())
}

/// Lay out the chart using `rng` for scatter jitter.
pub fn layout_with_rng<R: Rng>(
    groups: &[GroupSample],
    config: &ValidatedConfig,
    rng: &mut R,
) -> ChartDescription {
    let colors = config.colors();
    let (width, height) = figure_size_px(config.aspect_ratio);

    let bars = bar_geometry(groups, config.bar_width);

    let scatter = config.show_scatter.then(|| ScatterLayer {
        points: jittered_points(groups, config.jitter_range, rng),
        size: config.scatter_size,
        fill: colors.scatter.into(),
        edge: colors.scatter_edge.into(),
    });

    let error_bars = dispersion_kind(config).map(|kind| ErrorBarLayer {
        kind,
        spans: error_spans(groups, kind),
        color: colors.error_bar.into(),
        line_width: config.error_bar_line_width,
    });

    // horizontal
    let half_extent = if config.show_scatter {
        (config.bar_width / 2.0).max(config.jitter_range)
    } else {
        config.bar_width / 2.0
    };
    let (x_min, x_max) = scale::x_range(groups.len(), half_extent, config.x_margin);

    // vertical
    let (y_min, y_max, y_mode) = if config.auto_y_lim {
        let extent = y_extent(groups, &bars, scatter.as_ref(), error_bars.as_ref());
        let (lo, hi) = scale::auto_range(extent, true);
        (lo, hi, RangeMode::Auto)
    } else {
        (config.y_min, config.y_max, RangeMode::Fixed)
    };

    log::debug!(
        "layout: {} groups, x [{:.3}, {:.3}], y [{:.3}, {:.3}] ({:?})",
        groups.len(),
        x_min,
        x_max,
        y_min,
        y_max,
        y_mode
    );

    ChartDescription {
        width,
        height,
        title: TextSpec {
            text: config.title.clone(),
            font_size: config.title_font_size,
        },
        bars,
        bar_style: BarStyle {
            fill: colors.bar.into(),
            edge: colors.bar_edge.into(),
            edge_width: config.bar_edge_width,
        },
        scatter,
        error_bars,
        x_axis: AxisSpec {
            label: TextSpec {
                text: config.x_label.clone(),
                font_size: config.x_label_font_size,
            },
            min: x_min,
            max: x_max,
            mode: RangeMode::Auto,
            ticks: scale::category_ticks(groups.iter().map(|g| g.label.as_str())),
            tick_font_size: config.x_tick_font_size,
        },
        y_axis: AxisSpec {
            label: TextSpec {
                text: config.y_label.clone(),
                font_size: config.y_label_font_size,
            },
            min: y_min,
            max: y_max,
            mode: y_mode,
            ticks: scale::y_ticks(y_min, y_max, config.y_tick_interval),
            tick_font_size: config.y_tick_font_size,
        },
        axis_line_width: config.axis_line_width,
    }
}

/// Standard deviation wins when both dispersion displays are requested.
pub fn dispersion_kind(config: &ValidatedConfig) -> Option<Dispersion> {
    if config.show_error_bars {
        Some(Dispersion::StdDev)
    } else if config.show_std_err {
        Some(Dispersion::StdErr)
    } else {
        None
    }
}

fn bar_geometry(groups: &[GroupSample], bar_width: f64) -> Vec<BarGeometry> {
    let half = bar_width / 2.0;
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let center = i as f64;
            BarGeometry {
                group_index: i,
                label: group.label.clone(),
                center,
                left: center - half,
                right: center + half,
                bottom: 0.0,
                top: group.mean(),
            }
        })
        .collect()
}

fn jittered_points<R: Rng>(
    groups: &[GroupSample],
    jitter_range: f64,
    rng: &mut R,
) -> Vec<ScatterPoint> {
    let mut points = Vec::with_capacity(groups.iter().map(|g| g.values.len()).sum());
    for (i, group) in groups.iter().enumerate() {
        for &y in &group.values {
            let offset = if jitter_range > 0.0 {
                rng.random_range(-jitter_range..=jitter_range)
            } else {
                0.0
            };
            points.push(ScatterPoint {
                group_index: i,
                x: i as f64 + offset,
                y,
            });
        }
    }
    points
}

fn error_spans(groups: &[GroupSample], kind: Dispersion) -> Vec<ErrorSpan> {
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let half = match kind {
                Dispersion::StdDev => group.std_dev(),
                Dispersion::StdErr => group.std_err(),
            };
            ErrorSpan {
                group_index: i,
                x: i as f64,
                center: group.mean(),
                low: group.mean() - half,
                high: group.mean() + half,
            }
        })
        .collect()
}

fn y_extent(
    groups: &[GroupSample],
    bars: &[BarGeometry],
    scatter: Option<&ScatterLayer>,
    error_bars: Option<&ErrorBarLayer>,
) -> Extent {
    let mut extent = Extent::default();
    if groups.is_empty() {
        return extent;
    }
    for bar in bars {
        extent.include(bar.bottom);
        extent.include(bar.top);
    }
    if let Some(layer) = scatter {
        for p in &layer.points {
            extent.include(p.y);
        }
    }
    if let Some(layer) = error_bars {
        for span in &layer.spans {
            extent.include(span.low);
            extent.include(span.high);
        }
    }
    extent
}
