//! Student Scores Analysis
//!
//! Loads a CSV of student records, prints descriptive statistics, a
//! correlation matrix and the mean exam score per attendance group, then
//! renders five charts.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use student_scores::{AnalysisPipeline, HeadlessSurface, PipelineConfig, PrettyRenderer};
//!
//! let config = PipelineConfig::builder().input("Student scores.csv").build();
//! let mut renderer = PrettyRenderer::new(std::io::stdout());
//! let mut surface = HeadlessSurface::new(config.chart_size);
//!
//! let outcome = AnalysisPipeline::new(&config, &mut renderer, &mut surface).run()?;
//! println!("{} rows analyzed", outcome.rows_analyzed);
//! ```

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod gui;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use config::{DisplayMode, PipelineConfig, TableFormat};
pub use error::{PipelineError, Result};
pub use gui::{ChartSurface, HeadlessSurface, WindowSurface};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};
pub use report::{JsonRenderer, PrettyRenderer, TableRenderer};
