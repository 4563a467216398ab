//! PNG rendering of chart models with [`plotters`]
//!
//! Uses the bitmap backend only, so rendering works headless. Groups are
//! placed at integer x positions (0, 1, ...) and labelled by name.

use super::charts::{BoxPanelChart, Chart, GroupedBarChart, ViolinChart};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Tableau-style palette, one color per group
const GROUP_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

/// Half-width of a violin, box or bar cluster in x units
const HALF_WIDTH: f64 = 0.4;

fn group_color(index: usize) -> RGBColor {
    GROUP_COLORS[index % GROUP_COLORS.len()]
}

fn area_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::DrawingArea(e.to_string())
}

fn config_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::ChartConfig(e.to_string())
}

fn draw_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Value range with 5% padding; falls back to 0..1 for empty input
fn padded_range(lo: f64, hi: f64) -> Range<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let span = (hi - lo).max(1e-3);
    let pad = span * 0.05;
    (lo - pad)..(hi + pad)
}

/// Category axis: `-0.5..n-0.5` so category `i` sits at x = i
fn category_range(n: usize) -> Range<f64> {
    -0.5..(n as f64 - 0.5)
}

/// Label integer x positions with category names, everything else blank
fn category_formatter(names: &[String]) -> impl Fn(&f64) -> String + '_ {
    move |x| {
        let rounded = x.round();
        if (x - rounded).abs() < 1e-6 && rounded >= 0.0 && (rounded as usize) < names.len() {
            names[rounded as usize].clone()
        } else {
            String::new()
        }
    }
}

/// Render a chart to a PNG file
pub fn render_chart(chart: &Chart, output_path: &Path) -> Result<()> {
    match chart {
        Chart::Violin(c) => render_violin(c, output_path),
        Chart::BoxPanels(c) => render_box_panels(c, output_path),
        Chart::GroupedBars(c) => render_grouped_bars(c, output_path),
    }
}

fn render_violin(chart: &ViolinChart, output_path: &Path) -> Result<()> {
    if chart.curves.is_empty() {
        return Err(PlotError::InvalidData("no groups to plot".to_string()));
    }

    let root = BitMapBackend::new(output_path, (1800, 900)).into_drawing_area();
    root.fill(&WHITE).map_err(area_err)?;

    let values = chart
        .curves
        .iter()
        .flat_map(|c| c.points.iter().map(|(v, _)| *v));
    let lo = values.clone().fold(f64::INFINITY, f64::min);
    let hi = values.fold(f64::NEG_INFINITY, f64::max);
    let names: Vec<String> = chart.curves.iter().map(|c| c.label.to_string()).collect();

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(category_range(names.len()), padded_range(lo, hi))
        .map_err(config_err)?;

    let formatter = category_formatter(&names);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len() * 4)
        .x_label_formatter(&formatter)
        .x_desc("emotion_label")
        .y_desc(chart.feature.as_str())
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(draw_err)?;

    // Spikes (constant groups) carry a nominal density and are excluded from scaling
    let max_density = chart
        .curves
        .iter()
        .filter(|c| c.points.len() > 1)
        .flat_map(|c| c.points.iter().map(|(_, d)| *d))
        .fold(0.0, f64::max);
    let scale = if max_density > 0.0 {
        HALF_WIDTH / max_density
    } else {
        0.0
    };

    for (i, curve) in chart.curves.iter().enumerate() {
        let color = group_color(i);
        let center = i as f64;

        if curve.points.len() < 2 {
            if let Some(&(v, _)) = curve.points.first() {
                ctx.draw_series(std::iter::once(PathElement::new(
                    vec![(center - HALF_WIDTH, v), (center + HALF_WIDTH, v)],
                    color.stroke_width(3),
                )))
                .map_err(draw_err)?;
            }
            continue;
        }

        let mut outline: Vec<(f64, f64)> = curve
            .points
            .iter()
            .map(|&(v, d)| (center + d * scale, v))
            .collect();
        outline.extend(curve.points.iter().rev().map(|&(v, d)| (center - d * scale, v)));

        ctx.draw_series(std::iter::once(Polygon::new(
            outline.clone(),
            color.mix(0.6).filled(),
        )))
        .map_err(draw_err)?;

        outline.push(outline[0]);
        ctx.draw_series(std::iter::once(PathElement::new(outline, BLACK.stroke_width(1))))
            .map_err(draw_err)?;

        if let Some(median) = curve.median {
            let m = median as f64;
            ctx.draw_series(std::iter::once(PathElement::new(
                vec![(center - 0.1, m), (center + 0.1, m)],
                BLACK.stroke_width(3),
            )))
            .map_err(draw_err)?;
        }
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

fn render_box_panels(chart: &BoxPanelChart, output_path: &Path) -> Result<()> {
    if chart.panels.is_empty() {
        return Err(PlotError::InvalidData("no panels to plot".to_string()));
    }

    let root = BitMapBackend::new(output_path, (2250, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(area_err)?;
    let root = root
        .titled(&chart.title, ("sans-serif", 40))
        .map_err(area_err)?;

    let names: Vec<String> = chart.labels.iter().map(|l| l.to_string()).collect();
    let formatter = category_formatter(&names);
    let areas = root.split_evenly((1, chart.panels.len()));

    for (panel, area) in chart.panels.iter().zip(areas.iter()) {
        let extremes = panel.boxes.iter().flat_map(|b| {
            b.outliers
                .iter()
                .copied()
                .chain([b.whisker_low, b.whisker_high])
                .map(|v| v as f64)
        });
        let lo = extremes.clone().fold(f64::INFINITY, f64::min);
        let hi = extremes.fold(f64::NEG_INFINITY, f64::max);

        let mut ctx = ChartBuilder::on(area)
            .caption(&panel.feature, ("sans-serif", 30))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(category_range(names.len()), padded_range(lo, hi))
            .map_err(config_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(names.len() * 4)
            .x_label_formatter(&formatter)
            .label_style(("sans-serif", 20))
            .draw()
            .map_err(draw_err)?;

        for b in &panel.boxes {
            let index = chart.labels.iter().position(|l| *l == b.label).unwrap_or(0);
            let color = group_color(index);
            let x = index as f64;
            let (x0, x1) = (x - HALF_WIDTH * 0.75, x + HALF_WIDTH * 0.75);
            let (q1, median, q3) = (b.q1 as f64, b.median as f64, b.q3 as f64);
            let (lo, hi) = (b.whisker_low as f64, b.whisker_high as f64);

            ctx.draw_series([
                Rectangle::new([(x0, q1), (x1, q3)], color.mix(0.6).filled()),
                Rectangle::new([(x0, q1), (x1, q3)], BLACK.stroke_width(1)),
            ])
            .map_err(draw_err)?;

            ctx.draw_series([
                PathElement::new(vec![(x0, median), (x1, median)], BLACK.stroke_width(2)),
                PathElement::new(vec![(x, q3), (x, hi)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x, q1), (x, lo)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x - 0.1, hi), (x + 0.1, hi)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x - 0.1, lo), (x + 0.1, lo)], BLACK.stroke_width(1)),
            ])
            .map_err(draw_err)?;

            ctx.draw_series(
                b.outliers
                    .iter()
                    .map(|&v| Circle::new((x, v as f64), 4, BLACK.filled())),
            )
            .map_err(draw_err)?;
        }
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

fn render_grouped_bars(chart: &GroupedBarChart, output_path: &Path) -> Result<()> {
    if chart.features.is_empty() || chart.groups.is_empty() {
        return Err(PlotError::InvalidData("no bars to plot".to_string()));
    }

    let root = BitMapBackend::new(output_path, (1500, 750)).into_drawing_area();
    root.fill(&WHITE).map_err(area_err)?;

    let means = chart
        .groups
        .iter()
        .flat_map(|(_, means)| means.iter().flatten().map(|&m| m as f64))
        .filter(|m| m.is_finite());
    let lo = means.clone().fold(0.0, f64::min);
    let hi = means.fold(0.0, f64::max);
    let y_range = if hi > lo { lo..hi * 1.1 + 1e-3 } else { 0.0..1.0 };

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(category_range(chart.features.len()), y_range)
        .map_err(config_err)?;

    let formatter = category_formatter(&chart.features);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(chart.features.len() * 4)
        .x_label_formatter(&formatter)
        .x_desc("Action Unit")
        .y_desc("Intensity")
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(draw_err)?;

    let width = 2.0 * HALF_WIDTH / chart.groups.len() as f64;

    for (g, (label, means)) in chart.groups.iter().enumerate() {
        let color = group_color(g);
        let offset = -HALF_WIDTH + width * g as f64;

        let bars: Vec<Rectangle<(f64, f64)>> = means
            .iter()
            .enumerate()
            .filter_map(|(i, m)| {
                let m = (*m)? as f64;
                if !m.is_finite() {
                    return None;
                }
                let x0 = i as f64 + offset;
                Some(Rectangle::new([(x0, 0.0), (x0 + width, m)], color.filled()))
            })
            .collect();

        ctx.draw_series(bars)
            .map_err(draw_err)?
            .label(label.to_string())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.filled()));
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 25))
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}
