//! Pipeline configuration.
//!
//! Built from the command line in `main.rs`, or directly through
//! [`PipelineConfig::builder()`] in tests.

use std::path::PathBuf;

/// CSV file read when no `--input` is given.
pub const DEFAULT_INPUT: &str = "Student scores.csv";

/// Number of equal-width bins in the exam score histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 15;

/// Chart frame size in pixels (a 10x6 inch figure at 100 dpi).
pub const DEFAULT_CHART_SIZE: (u32, u32) = (1000, 600);

/// Where rendered charts are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// One native window per chart, blocking until closed.
    #[default]
    Window,
    /// Render each chart in memory and discard it.
    Headless,
}

/// How tables are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path of the CSV source.
    /// Default: "Student scores.csv"
    pub input: PathBuf,

    /// Chart display surface.
    /// Default: Window
    pub display: DisplayMode,

    /// Table rendering format.
    /// Default: Pretty
    pub table_format: TableFormat,

    /// Histogram bin count.
    /// Default: 15
    pub histogram_bins: usize,

    /// Chart width and height in pixels.
    /// Default: 1000 x 600
    pub chart_size: (u32, u32),
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            display: DisplayMode::default(),
            table_format: TableFormat::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            chart_size: DEFAULT_CHART_SIZE,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Fluent builder for [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input = path.into();
        self
    }

    pub fn display(mut self, display: DisplayMode) -> Self {
        self.config.display = display;
        self
    }

    pub fn table_format(mut self, format: TableFormat) -> Self {
        self.config.table_format = format;
        self
    }

    /// Values below 1 are raised to 1.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.config.histogram_bins = bins.max(1);
        self
    }

    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.config.chart_size = (width.max(1), height.max(1));
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}
