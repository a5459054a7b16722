//! Charts module - Chart data and rendering

mod model;
mod renderer;

pub use model::{
    histogram, kde_curve, paired_values, scott_bandwidth, Bar, BarChart, Chart, ChartFactory,
    ChartLabels, HistogramBin, HistogramChart, LineChart, ScatterChart, HOURS_STUDIED_COL,
    KDE_GRID_SIZE, SLEEP_HOURS_COL,
};
pub use renderer::StaticChartRenderer;
