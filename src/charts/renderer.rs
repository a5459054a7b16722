//! Static Chart Renderer
//! Draws a [`Chart`] into an in-memory RGB frame with plotters.
//!
//! Every chart uses the same frame: white background, light grid,
//! title on top and axis captions on both axes.

use crate::charts::model::{BarChart, Chart, HistogramChart, LineChart, Rgb, ScatterChart};
use crate::error::{PipelineError, Result};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;
type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 24;
const LABEL_SIZE: u32 = 18;
const GRID: RGBColor = RGBColor(230, 230, 230);
const MARKER_RADIUS: u32 = 4;

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Range over `values` padded by 5% on both sides.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart into a `width` x `height` RGB frame.
    pub fn render(chart: &Chart, (width, height): (u32, u32)) -> Result<RgbImage> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(chart, &root).map_err(|e| PipelineError::Render(e.to_string()))?;
        }

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| PipelineError::Render("frame buffer size mismatch".to_string()))
    }

    fn draw(chart: &Chart, root: &Area<'_>) -> DrawResult<()> {
        root.fill(&WHITE)?;
        match chart {
            Chart::Histogram(c) => Self::draw_histogram(root, c)?,
            Chart::Scatter(c) => Self::draw_scatter(root, c)?,
            Chart::Bar(c) => Self::draw_bars(root, c)?,
            Chart::Line(c) => Self::draw_line(root, c)?,
        }
        root.present()?;
        Ok(())
    }

    fn draw_histogram(root: &Area<'_>, chart: &HistogramChart) -> DrawResult<()> {
        let (Some(first), Some(last)) = (chart.bins.first(), chart.bins.last()) else {
            return Ok(());
        };

        let tallest = chart
            .bins
            .iter()
            .map(|b| b.count as f64)
            .chain(chart.density.iter().map(|p| p.1))
            .fold(1.0, f64::max);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.labels.title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(first.start..last.end, 0f64..tallest * 1.1)?;

        ctx.configure_mesh()
            .light_line_style(&GRID)
            .x_desc(&chart.labels.x)
            .y_desc(&chart.labels.y)
            .axis_desc_style((FONT, LABEL_SIZE))
            .draw()?;

        let color = rgb(chart.color);
        ctx.draw_series(chart.bins.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], color.mix(0.6).filled())
        }))?;
        ctx.draw_series(chart.bins.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], WHITE.stroke_width(1))
        }))?;

        if !chart.density.is_empty() {
            ctx.draw_series(LineSeries::new(
                chart.density.iter().copied(),
                color.stroke_width(2),
            ))?;
        }
        Ok(())
    }

    fn draw_scatter(root: &Area<'_>, chart: &ScatterChart) -> DrawResult<()> {
        let x_range = padded_range(chart.points.iter().map(|p| p.0));
        let y_range = padded_range(chart.points.iter().map(|p| p.1));

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.labels.title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        ctx.configure_mesh()
            .light_line_style(&GRID)
            .x_desc(&chart.labels.x)
            .y_desc(&chart.labels.y)
            .axis_desc_style((FONT, LABEL_SIZE))
            .draw()?;

        let color = rgb(chart.color);
        ctx.draw_series(
            chart
                .points
                .iter()
                .map(|&p| Circle::new(p, MARKER_RADIUS, color.mix(0.8).filled())),
        )?;
        Ok(())
    }

    fn draw_bars(root: &Area<'_>, chart: &BarChart) -> DrawResult<()> {
        let n = chart.bars.len() as i32;
        let tallest = chart
            .bars
            .iter()
            .map(|b| b.ci.map_or(b.value, |(_, hi)| hi.max(b.value)))
            .fold(1.0, f64::max);
        let names: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.labels.title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..tallest * 1.15)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .light_line_style(&GRID)
            .x_labels(chart.bars.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => names
                    .get(*i as usize)
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(&chart.labels.x)
            .y_desc(&chart.labels.y)
            .axis_desc_style((FONT, LABEL_SIZE))
            .draw()?;

        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let i = i as i32;
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), bar.value)],
                rgb(bar.color).filled(),
            );
            rect.set_margin(0, 0, 20, 20);
            rect
        }))?;

        ctx.draw_series(chart.bars.iter().enumerate().filter_map(|(i, bar)| {
            let (lo, hi) = bar.ci?;
            Some(ErrorBar::new_vertical(
                SegmentValue::CenterOf(i as i32),
                lo,
                bar.value,
                hi,
                BLACK.stroke_width(2),
                12,
            ))
        }))?;
        Ok(())
    }

    fn draw_line(root: &Area<'_>, chart: &LineChart) -> DrawResult<()> {
        let x_range = padded_range(chart.points.iter().map(|p| p.0));
        let y_range = padded_range(chart.points.iter().map(|p| p.1));

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.labels.title, (FONT, TITLE_SIZE))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        ctx.configure_mesh()
            .light_line_style(&GRID)
            .x_desc(&chart.labels.x)
            .y_desc(&chart.labels.y)
            .axis_desc_style((FONT, LABEL_SIZE))
            .draw()?;

        // Row order, so a non-monotonic x zig-zags.
        let color = rgb(chart.color);
        ctx.draw_series(LineSeries::new(
            chart.points.iter().copied(),
            color.stroke_width(2),
        ))?;
        ctx.draw_series(
            chart
                .points
                .iter()
                .map(|&p| Circle::new(p, MARKER_RADIUS, color.filled())),
        )?;
        Ok(())
    }
}
