use crate::error::{ChartError, Result};
use crate::ir::{ChartDescription, Tick};
use crate::style::{marker_radius_px, points_to_px, stroke_px};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

const FONT: &str = "sans-serif";
const MARGIN_PX: u32 = 10;
const LABEL_PAD_PX: f64 = 6.0;
const TICK_LEN_PX: i32 = 5;

/// Draw a chart description into an RGB buffer and encode it as PNG.
pub fn render_png(desc: &ChartDescription) -> Result<Vec<u8>> {
    let (width, height) = (desc.width, desc.height);
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_chart(&root, desc)?;
        root.present().map_err(render_err)?;
    }
    encode_png(&buffer, width, height)
}

/// Encode a packed RGB8 buffer as PNG
pub fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes).write_image(
        buffer,
        width,
        height,
        image::ColorType::Rgb8,
    )?;
    Ok(png_bytes)
}

/// Tick marks drawn on each axis: data position and pixel coordinate
/// along that axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisMarks {
    pub x: Vec<(f64, i32)>,
    pub y: Vec<(f64, i32)>,
}

/// Draw onto any plotters backend.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    desc: &ChartDescription,
) -> Result<AxisMarks> {
    root.fill(&WHITE).map_err(render_err)?;

    let x_axis = &desc.x_axis;
    let y_axis = &desc.y_axis;

    let x_tick_px = points_to_px(x_axis.tick_font_size);
    let y_tick_px = points_to_px(y_axis.tick_font_size);
    let x_desc_px = points_to_px(x_axis.label.font_size);
    let y_desc_px = points_to_px(y_axis.label.font_size);

    let x_area = x_tick_px + x_desc_px + 3.0 * LABEL_PAD_PX + TICK_LEN_PX as f64;
    let y_area = widest_label(&y_axis.ticks) as f64 * y_tick_px * 0.6
        + y_desc_px
        + 3.0 * LABEL_PAD_PX
        + TICK_LEN_PX as f64;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN_PX)
        .caption(&desc.title.text, (FONT, points_to_px(desc.title.font_size)))
        .x_label_area_size(x_area.ceil() as u32)
        .y_label_area_size(y_area.ceil() as u32)
        .build_cartesian_2d(x_axis.min..x_axis.max, y_axis.min..y_axis.max)
        .map_err(render_err)?;

    let axis_px = stroke_px(desc.axis_line_width);

    // Bars
    let fill: RGBColor = desc.bar_style.fill.into();
    let edge: RGBColor = desc.bar_style.edge.into();
    let edge_px = stroke_px(desc.bar_style.edge_width);
    for bar in &desc.bars {
        let Some((left, right)) = clip_span(bar.left, bar.right, x_axis.min, x_axis.max) else {
            continue;
        };
        let Some((low, high)) = clip_span(bar.bottom, bar.top, y_axis.min, y_axis.max) else {
            continue;
        };
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, low), (right, high)],
                fill.filled(),
            )))
            .map_err(render_err)?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, low), (right, high)],
                edge.stroke_width(edge_px),
            )))
            .map_err(render_err)?;
    }

    // Individual observations
    if let Some(scatter) = &desc.scatter {
        let radius = marker_radius_px(scatter.size).round().max(1.0) as i32;
        let fill: RGBColor = scatter.fill.into();
        let edge: RGBColor = scatter.edge.into();
        let visible: Vec<(f64, f64)> = scatter
            .points
            .iter()
            .filter(|p| x_axis.contains(p.x) && y_axis.contains(p.y))
            .map(|p| (p.x, p.y))
            .collect();
        chart
            .draw_series(visible.iter().map(|&pt| Circle::new(pt, radius, fill.filled())))
            .map_err(render_err)?;
        chart
            .draw_series(visible.iter().map(|&pt| Circle::new(pt, radius, edge.stroke_width(1))))
            .map_err(render_err)?;
    }

    // Error bars
    if let Some(errors) = &desc.error_bars {
        let color: RGBColor = errors.color.into();
        let line_px = stroke_px(errors.line_width);
        for span in &errors.spans {
            if !x_axis.contains(span.x) {
                continue;
            }
            if let Some((low, high)) = clip_span(span.low, span.high, y_axis.min, y_axis.max) {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        vec![(span.x, low), (span.x, high)],
                        color.stroke_width(line_px),
                    )))
                    .map_err(render_err)?;
            }
        }
    }

    // Frame on all four sides
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x_axis.min, y_axis.min), (x_axis.max, y_axis.max)],
            BLACK.stroke_width(axis_px),
        )))
        .map_err(render_err)?;

    // Ticks at exactly the described positions
    let mut marks = AxisMarks::default();
    let tick_style = BLACK.stroke_width(axis_px);
    let x_label_style = TextStyle::from((FONT, x_tick_px).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for tick in x_axis.ticks.iter().filter(|t| x_axis.contains(t.position)) {
        let (px, py) = chart.backend_coord(&(tick.position, y_axis.min));
        root.draw(&PathElement::new(vec![(px, py), (px, py + TICK_LEN_PX)], tick_style))
            .map_err(render_err)?;
        root.draw_text(&tick.label, &x_label_style, (px, py + TICK_LEN_PX + LABEL_PAD_PX as i32))
            .map_err(render_err)?;
        marks.x.push((tick.position, px));
    }
    let y_label_style = TextStyle::from((FONT, y_tick_px).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for tick in y_axis.ticks.iter().filter(|t| y_axis.contains(t.position)) {
        let (px, py) = chart.backend_coord(&(x_axis.min, tick.position));
        root.draw(&PathElement::new(vec![(px - TICK_LEN_PX, py), (px, py)], tick_style))
            .map_err(render_err)?;
        root.draw_text(&tick.label, &y_label_style, (px - TICK_LEN_PX - LABEL_PAD_PX as i32, py))
            .map_err(render_err)?;
        marks.y.push((tick.position, py));
    }

    // Axis descriptions (each axis has its own font size)
    let (px_range, py_range) = chart.plotting_area().get_pixel_range();
    if !x_axis.label.text.is_empty() {
        let style = TextStyle::from((FONT, x_desc_px).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let x = (px_range.start + px_range.end) / 2;
        let y = py_range.end + TICK_LEN_PX + (x_tick_px + 2.0 * LABEL_PAD_PX) as i32;
        root.draw_text(&x_axis.label.text, &style, (x, y))
            .map_err(render_err)?;
    }
    if !y_axis.label.text.is_empty() {
        let style = TextStyle::from((FONT, y_desc_px).into_font())
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let x = MARGIN_PX as i32 + (y_desc_px / 2.0) as i32;
        let y = (py_range.start + py_range.end) / 2;
        root.draw_text(&y_axis.label.text, &style, (x, y))
            .map_err(render_err)?;
    }

    log::debug!(
        "drew {} bars and {} y ticks on {}x{} canvas",
        desc.bars.len(),
        marks.y.len(),
        desc.width,
        desc.height
    );

    Ok(marks)
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

fn widest_label(ticks: &[Tick]) -> usize {
    ticks.iter().map(|t| t.label.chars().count()).max().unwrap_or(1)
}

/// Intersect `[a, b]` (in either order) with `[min, max]`.
fn clip_span(a: f64, b: f64, min: f64, max: f64) -> Option<(f64, f64)> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let lo = lo.max(min);
    let hi = hi.min(max);
    (lo <= hi).then_some((lo, hi))
}
