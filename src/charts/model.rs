//! Chart Model Module
//! Turns the cleaned table into plot-ready series for the five charts.

use crate::data::DataLoader;
use crate::error::{PipelineError, Result};
use crate::stats::{GroupSummary, EXAM_SCORE_COL};
use polars::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

pub const HOURS_STUDIED_COL: &str = "hours_studied";
pub const SLEEP_HOURS_COL: &str = "sleep_hours";

/// Grid points of the density curve.
pub const KDE_GRID_SIZE: usize = 200;

pub type Rgb = (u8, u8, u8);

pub const SKY_BLUE: Rgb = (135, 206, 235);
pub const SALMON: Rgb = (250, 128, 114);
pub const MEDIUM_SEA_GREEN: Rgb = (60, 179, 113);
pub const PURPLE: Rgb = (128, 0, 128);

/// Pastel bar colours, one per attendance group.
pub const PASTEL: [Rgb; 3] = [(161, 201, 244), (255, 180, 130), (141, 229, 161)];

/// Title and axis captions of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLabels {
    pub title: String,
    pub x: String,
    pub y: String,
}

impl ChartLabels {
    fn new(title: &str, x: &str, y: &str) -> Self {
        Self {
            title: title.to_string(),
            x: x.to_string(),
            y: y.to_string(),
        }
    }
}

/// One histogram bin; the last bin of a histogram is closed on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct HistogramChart {
    pub labels: ChartLabels,
    pub bins: Vec<HistogramBin>,
    /// Density curve scaled to bin counts; empty when it cannot be estimated.
    pub density: Vec<(f64, f64)>,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub struct ScatterChart {
    pub labels: ChartLabels,
    pub points: Vec<(f64, f64)>,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub ci: Option<(f64, f64)>,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub struct BarChart {
    pub labels: ChartLabels,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone)]
pub struct LineChart {
    pub labels: ChartLabels,
    /// Points in table row order.
    pub points: Vec<(f64, f64)>,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub enum Chart {
    Histogram(HistogramChart),
    Scatter(ScatterChart),
    Bar(BarChart),
    Line(LineChart),
}

impl Chart {
    pub fn labels(&self) -> &ChartLabels {
        match self {
            Chart::Histogram(c) => &c.labels,
            Chart::Scatter(c) => &c.labels,
            Chart::Bar(c) => &c.labels,
            Chart::Line(c) => &c.labels,
        }
    }

    pub fn title(&self) -> &str {
        &self.labels().title
    }
}

/// Split `values` into `bins` equal-width bins spanning their min-max range.
///
/// A single distinct value is spread over `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &value in values {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: if idx + 1 == bins {
                max
            } else {
                min + (idx + 1) as f64 * width
            },
            count,
        })
        .collect()
}

/// Scott's rule kernel bandwidth: sample std times `n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let std = values.iter().std_dev();
    let bandwidth = std * (values.len() as f64).powf(-0.2);
    (bandwidth.is_finite() && bandwidth > 0.0).then_some(bandwidth)
}

/// Gaussian kernel density estimate over `[lo, hi]`, multiplied by `scale`.
pub fn kde_curve(values: &[f64], lo: f64, hi: f64, points: usize, scale: f64) -> Vec<(f64, f64)> {
    let Some(bandwidth) = scott_bandwidth(values) else {
        return Vec::new();
    };
    if points < 2 || hi <= lo {
        return Vec::new();
    }

    let kernel = Normal::standard();
    let norm = scale / (values.len() as f64 * bandwidth);
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|v| kernel.pdf((x - v) / bandwidth))
                .sum();
            (x, density * norm)
        })
        .collect()
}

/// Complete `(x, y)` pairs of two numeric columns, in row order.
pub fn paired_values(df: &DataFrame, x_col: &str, y_col: &str) -> Result<Vec<(f64, f64)>> {
    DataLoader::require_numeric(df, &[x_col, y_col])?;
    let x = df.column(x_col)?.cast(&DataType::Float64)?;
    let y = df.column(y_col)?.cast(&DataType::Float64)?;

    let points = x
        .f64()?
        .into_iter()
        .zip(y.f64()?.into_iter())
        .filter_map(|(a, b)| Some((a?, b?)))
        .collect();
    Ok(points)
}

/// Builds the five charts of the analysis from the cleaned table.
pub struct ChartFactory;

impl ChartFactory {
    pub fn exam_score_histogram(df: &DataFrame, bins: usize) -> Result<HistogramChart> {
        let scores = DataLoader::column_values(df, EXAM_SCORE_COL)?;
        if scores.is_empty() {
            return Err(PipelineError::EmptyColumn(EXAM_SCORE_COL.to_string()));
        }

        let bins = histogram(&scores, bins);
        let density = match bins.first() {
            Some(first) => {
                let scale = scores.len() as f64 * (first.end - first.start);
                let lo = scores.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                kde_curve(&scores, lo, hi, KDE_GRID_SIZE, scale)
            }
            None => Vec::new(),
        };

        Ok(HistogramChart {
            labels: ChartLabels::new("Distribution of Exam Scores", "Exam Score", "Frequency"),
            bins,
            density,
            color: SKY_BLUE,
        })
    }

    pub fn scatter(
        df: &DataFrame,
        x_col: &str,
        labels: ChartLabels,
        color: Rgb,
    ) -> Result<ScatterChart> {
        let points = paired_values(df, x_col, EXAM_SCORE_COL)?;
        if points.is_empty() {
            return Err(PipelineError::EmptyColumn(x_col.to_string()));
        }
        Ok(ScatterChart {
            labels,
            points,
            color,
        })
    }

    pub fn attendance_bars(summary: &GroupSummary) -> Result<BarChart> {
        if summary.rows.is_empty() {
            return Err(PipelineError::EmptyColumn(EXAM_SCORE_COL.to_string()));
        }

        let bars = summary
            .rows
            .iter()
            .map(|row| Bar {
                label: row.group.label().to_string(),
                value: row.mean,
                ci: row.ci,
                color: PASTEL[row.group as usize % PASTEL.len()],
            })
            .collect();

        Ok(BarChart {
            labels: ChartLabels::new(
                "Average Exam Score by Attendance Level",
                "Attendance Group",
                "Average Exam Score",
            ),
            bars,
        })
    }

    /// Hours studied against exam score, joined in row order without sorting.
    pub fn study_trend(df: &DataFrame) -> Result<LineChart> {
        let points = paired_values(df, HOURS_STUDIED_COL, EXAM_SCORE_COL)?;
        if points.is_empty() {
            return Err(PipelineError::EmptyColumn(HOURS_STUDIED_COL.to_string()));
        }
        Ok(LineChart {
            labels: ChartLabels::new(
                "Trend Between Hours Studied and Exam Scores",
                "Hours Studied",
                "Exam Score",
            ),
            points,
            color: PURPLE,
        })
    }

    /// All five charts, in display order.
    pub fn build_all(df: &DataFrame, summary: &GroupSummary, bins: usize) -> Result<Vec<Chart>> {
        Ok(vec![
            Chart::Histogram(Self::exam_score_histogram(df, bins)?),
            Chart::Scatter(Self::scatter(
                df,
                HOURS_STUDIED_COL,
                ChartLabels::new(
                    "Relationship: Hours Studied vs Exam Score",
                    "Hours Studied",
                    "Exam Score",
                ),
                SALMON,
            )?),
            Chart::Scatter(Self::scatter(
                df,
                SLEEP_HOURS_COL,
                ChartLabels::new(
                    "Relationship: Sleep Hours vs Exam Score",
                    "Sleep Hours",
                    "Exam Score",
                ),
                MEDIUM_SEA_GREEN,
            )?),
            Chart::Bar(Self::attendance_bars(summary)?),
            Chart::Line(Self::study_trend(df)?),
        ])
    }
}
