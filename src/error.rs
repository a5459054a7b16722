//! Error types for the analysis pipeline.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input CSV does not exist.
    #[error("File not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// A chart was requested for a column with no values left.
    #[error("Column '{0}' has no values to plot")]
    EmptyColumn(String),

    #[error("Failed to render chart: {0}")]
    Render(String),

    #[error("Failed to display chart: {0}")]
    Display(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
