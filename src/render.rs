//! PNG snapshots of chart descriptions.
//!
//! The browser dashboard renders charts with Plotly; this module draws the
//! same [`Chart`] values with plotters so the reports can be exported
//! without a browser. Styling is approximate: colors, titles, axis labels
//! and category names carry over, Plotly-only hints (templates, text
//! positions, color bars) are ignored.

use crate::chart::{
    BarTrace, Chart, ChartKind, HeatmapTrace, HistogramTrace, Layout, LineTrace, Marker,
    MarkerColor, PieTrace, Trace,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::f64::consts::PI;
use std::path::Path;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Fallback colors for markers without an explicit color
const PALETTE: [RGBColor; 6] = [
    RGBColor(0, 168, 204),
    RGBColor(255, 107, 107),
    RGBColor(78, 205, 196),
    RGBColor(255, 217, 61),
    RGBColor(108, 92, 231),
    RGBColor(99, 110, 114),
];

/// One histogram bin, `[start, end)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: u32,
}

/// Draws a chart description into a PNG file
///
/// # Arguments
/// * `chart` - Chart to draw; its layout height is used as image height
/// * `path` - Destination PNG file
/// * `width` - Image width in pixels
///
/// # Returns
/// * A Result indicating success or failure
pub fn render_chart(chart: &Chart, path: &Path, width: u32) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (width, chart.layout.height)).into_drawing_area();
    root.fill(&WHITE)?;

    match chart.kind {
        ChartKind::Bar | ChartKind::HorizontalBar => {
            let trace = chart
                .data
                .iter()
                .find_map(|t| match t {
                    Trace::Bar(bar) => Some(bar),
                    _ => None,
                })
                .ok_or("bar chart without a bar trace")?;
            draw_bars(&root, &chart.layout, trace)?;
        }
        ChartKind::Histogram => {
            let traces: Vec<&HistogramTrace> = chart
                .data
                .iter()
                .filter_map(|t| match t {
                    Trace::Histogram(h) => Some(h),
                    _ => None,
                })
                .collect();
            draw_histograms(&root, &chart.layout, &traces)?;
        }
        ChartKind::Line => {
            let trace = chart
                .data
                .iter()
                .find_map(|t| match t {
                    Trace::Line(line) => Some(line),
                    _ => None,
                })
                .ok_or("line chart without a line trace")?;
            draw_line(&root, &chart.layout, trace)?;
        }
        ChartKind::Heatmap => {
            let trace = chart
                .data
                .iter()
                .find_map(|t| match t {
                    Trace::Heatmap(h) => Some(h),
                    _ => None,
                })
                .ok_or("heatmap chart without a heatmap trace")?;
            draw_heatmap(&root, &chart.layout, trace)?;
        }
        ChartKind::Pie => {
            let trace = chart
                .data
                .iter()
                .find_map(|t| match t {
                    Trace::Pie(p) => Some(p),
                    _ => None,
                })
                .ok_or("pie chart without a pie trace")?;
            draw_pie(&root, &chart.layout, trace)?;
        }
    }

    root.present()?;
    Ok(())
}

fn draw_bars(root: &Area, layout: &Layout, trace: &BarTrace) -> Result<(), Box<dyn Error>> {
    let categories = trace.categories();
    let values = trace.values();
    let slots = categories.len().max(1) as f64;
    let top = values.iter().copied().fold(0.0, f64::max).max(1.0) * 1.1;
    let label = |pos: &f64| category_label(categories, *pos);

    let mut builder = ChartBuilder::on(root);
    builder
        .caption(&layout.title.text, ("sans-serif", 24).into_font())
        .margin(10);

    if trace.is_horizontal() {
        let mut chart = builder
            .x_label_area_size(40)
            .y_label_area_size(160)
            .build_cartesian_2d(0f64..top, -0.5f64..slots - 0.5)?;

        chart
            .configure_mesh()
            .x_desc(layout.x_title())
            .y_desc(layout.y_title())
            .y_labels(categories.len())
            .y_label_formatter(&label)
            .disable_y_mesh()
            .draw()?;

        chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
            let y = i as f64;
            Rectangle::new(
                [(0.0, y - 0.4), (v, y + 0.4)],
                marker_color(trace.marker.as_ref(), i).filled(),
            )
        }))?;
    } else {
        let mut chart = builder
            .x_label_area_size(60)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..slots - 0.5, 0f64..top)?;

        chart
            .configure_mesh()
            .x_desc(layout.x_title())
            .y_desc(layout.y_title())
            .x_labels(categories.len())
            .x_label_formatter(&label)
            .disable_x_mesh()
            .draw()?;

        chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.4, 0.0), (x + 0.4, v)],
                marker_color(trace.marker.as_ref(), i).filled(),
            )
        }))?;
    }

    Ok(())
}

fn draw_histograms(
    root: &Area,
    layout: &Layout,
    traces: &[&HistogramTrace],
) -> Result<(), Box<dyn Error>> {
    let binned: Vec<Vec<Bin>> = traces
        .iter()
        .map(|t| bin_values(&t.x, t.nbinsx as usize))
        .collect();

    let all_bins = binned.iter().flatten();
    let low = all_bins.clone().map(|b| b.start).fold(f64::INFINITY, f64::min);
    let high = all_bins.clone().map(|b| b.end).fold(f64::NEG_INFINITY, f64::max);
    let (low, high) = if low.is_finite() && high.is_finite() {
        (low, high)
    } else {
        (0.0, 1.0)
    };
    let top = all_bins.map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(&layout.title.text, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(low..high, 0f64..top)?;

    chart
        .configure_mesh()
        .x_desc(layout.x_title())
        .y_desc(layout.y_title())
        .draw()?;

    for (i, (trace, bins)) in traces.iter().zip(&binned).enumerate() {
        let fill = marker_color(Some(&trace.marker), i).mix(trace.opacity);
        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], fill.filled())
            }))?
            .label(trace.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_line(root: &Area, layout: &Layout, trace: &LineTrace) -> Result<(), Box<dyn Error>> {
    let labels = trace.x.as_text().unwrap_or_default();
    let points: Vec<(f64, f64)> = trace
        .y
        .iter()
        .enumerate()
        .map(|(i, &y)| (i as f64, y))
        .collect();
    let slots = points.len().max(1) as f64;
    let top = trace.y.iter().copied().fold(0.0, f64::max).max(1.0) * 1.1;
    let color = parse_hex(&trace.line.color).unwrap_or(PALETTE[0]);
    let label = |pos: &f64| category_label(labels, *pos);

    let mut chart = ChartBuilder::on(root)
        .caption(&layout.title.text, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..slots - 0.5, 0f64..top)?;

    chart
        .configure_mesh()
        .x_desc(layout.x_title())
        .y_desc(layout.y_title())
        .x_labels(labels.len().min(8))
        .x_label_formatter(&label)
        .draw()?;

    if trace.fill.is_some() {
        chart.draw_series(
            AreaSeries::new(points.iter().copied(), 0.0, color.mix(0.2))
                .border_style(color.stroke_width(trace.line.width)),
        )?;
    } else {
        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            color.stroke_width(trace.line.width),
        ))?;
    }

    let radius = trace.marker.size.unwrap_or(6) / 2;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), radius, color.filled())),
    )?;

    Ok(())
}

fn draw_heatmap(root: &Area, layout: &Layout, trace: &HeatmapTrace) -> Result<(), Box<dyn Error>> {
    let columns = trace.x.len().max(1) as f64;
    let rows = trace.y.len().max(1) as f64;
    let peak = trace.z.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
    let x_label = |pos: &f64| category_label(&trace.x, *pos);
    let y_label = |pos: &f64| category_label(&trace.y, *pos);

    let mut chart = ChartBuilder::on(root)
        .caption(&layout.title.text, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(160)
        .build_cartesian_2d(-0.5f64..columns - 0.5, -0.5f64..rows - 0.5)?;

    chart
        .configure_mesh()
        .x_desc(layout.x_title())
        .y_desc(layout.y_title())
        .x_labels(trace.x.len())
        .y_labels(trace.y.len())
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .disable_mesh()
        .draw()?;

    let cells: Vec<(f64, f64, u32)> = trace
        .z
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(move |(j, &v)| (j as f64, i as f64, v))
        })
        .collect();

    chart.draw_series(cells.iter().map(|&(x, y, v)| {
        Rectangle::new(
            [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
            blues(v as f64 / peak).filled(),
        )
    }))?;

    chart.draw_series(cells.iter().map(|&(x, y, v)| {
        Text::new(
            v.to_string(),
            (x - 0.05, y + 0.1),
            ("sans-serif", 14).into_font(),
        )
    }))?;

    Ok(())
}

fn draw_pie(root: &Area, layout: &Layout, trace: &PieTrace) -> Result<(), Box<dyn Error>> {
    let area = root.titled(&layout.title.text, ("sans-serif", 24).into_font())?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;
    let total: f64 = trace.values.iter().sum();
    if total <= 0.0 {
        return Ok(());
    }

    let point_at = |angle: f64, r: f64| {
        (
            center.0 + (r * angle.cos()).round() as i32,
            center.1 + (r * angle.sin()).round() as i32,
        )
    };

    let mut start = -PI / 2.0;
    for (i, (label, &value)) in trace.labels.iter().zip(&trace.values).enumerate() {
        let sweep = value / total * 2.0 * PI;
        let steps = ((sweep.to_degrees()).ceil() as usize).max(1);

        let mut wedge = vec![center];
        wedge.extend((0..=steps).map(|s| point_at(start + sweep * s as f64 / steps as f64, radius)));
        area.draw(&Polygon::new(
            wedge,
            marker_color(trace.marker.as_ref(), i).filled(),
        ))?;

        let share = value / total * 100.0;
        area.draw(&Text::new(
            format!("{label}: {value} ({share:.1}%)"),
            point_at(start + sweep / 2.0, radius * 1.1),
            ("sans-serif", trace.textfont.size as f64).into_font(),
        ))?;

        start += sweep;
    }

    if trace.hole > 0.0 {
        let inner = (radius * trace.hole).round() as i32;
        area.draw(&Circle::new(center, inner, WHITE.filled()))?;
    }

    Ok(())
}

/// Split samples into `nbins` equal-width bins spanning their range
///
/// Returns no bins for no samples. A single distinct value gets one bin of
/// width 1.
pub fn bin_values(values: &[f64], nbins: usize) -> Vec<Bin> {
    if values.is_empty() || nbins == 0 {
        return Vec::new();
    }

    let low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if high <= low {
        return vec![Bin {
            start: low,
            end: low + 1.0,
            count: values.len() as u32,
        }];
    }

    let width = (high - low) / nbins as f64;
    let mut bins: Vec<Bin> = (0..nbins)
        .map(|i| Bin {
            start: low + width * i as f64,
            end: low + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &v in values {
        // the maximum lands in the last bin
        let idx = (((v - low) / width).floor() as usize).min(nbins - 1);
        bins[idx].count += 1;
    }
    bins
}

/// Parse `#rrggbb`
pub fn parse_hex(color: &str) -> Option<RGBColor> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

fn marker_color(marker: Option<&Marker>, index: usize) -> RGBColor {
    let fallback = PALETTE[index % PALETTE.len()];
    let Some(marker) = marker else {
        return fallback;
    };

    let explicit = match (&marker.color, &marker.colors) {
        (Some(MarkerColor::Solid(c)), _) => Some(c.as_str()),
        (Some(MarkerColor::PerPoint(cs)), _) | (_, Some(cs)) => cs.get(index).map(String::as_str),
        (Some(MarkerColor::Scale(_)), None) | (None, None) => None,
    };
    explicit.and_then(parse_hex).unwrap_or(fallback)
}

/// White to dark blue, `t` in `[0, 1]`
fn blues(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
    RGBColor(lerp(247, 8), lerp(251, 48), lerp(255, 107))
}

/// Category name for an axis position, blank between categories
fn category_label(categories: &[String], pos: f64) -> String {
    let nearest = pos.round();
    if (pos - nearest).abs() > 0.01 || nearest < 0.0 {
        return String::new();
    }
    categories.get(nearest as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_cover_the_range_and_keep_every_sample() {
        let bins = bin_values(&[1.0, 2.0, 3.0, 4.0, 10.0], 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins[0].start, 1.0);
        assert_eq!(bins[2].end, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u32>(), 5);
        assert_eq!(bins[2].count, 1);
    }

    #[test]
    fn single_value_gets_one_bin() {
        let bins = bin_values(&[7.0, 7.0], 10);
        assert_eq!(
            bins,
            vec![Bin {
                start: 7.0,
                end: 8.0,
                count: 2
            }]
        );
        assert!(bin_values(&[], 10).is_empty());
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex("#00a8cc"), Some(RGBColor(0, 168, 204)));
        assert_eq!(parse_hex("00a8cc"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn marker_colors_fall_back_to_palette() {
        let per_point = Marker::per_point(&["#4ecdc4", "#ff6b6b"]);
        assert_eq!(marker_color(Some(&per_point), 1), RGBColor(255, 107, 107));
        assert_eq!(marker_color(Some(&per_point), 2), PALETTE[2]);
        assert_eq!(marker_color(None, 0), PALETTE[0]);
    }

    #[test]
    fn category_labels_only_at_whole_positions() {
        let cats = vec!["A".to_string(), "B".to_string()];
        assert_eq!(category_label(&cats, 1.0), "B");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 5.0), "");
        assert_eq!(category_label(&cats, -1.0), "");
    }
}
