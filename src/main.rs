//! Student Scores - CSV analysis of student performance
//!
//! Prints dataset structure, descriptive statistics and grouped means, then
//! shows five charts.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use student_scores::config::DEFAULT_INPUT;
use student_scores::{
    AnalysisPipeline, ChartSurface, DisplayMode, HeadlessSurface, JsonRenderer, PipelineConfig,
    PrettyRenderer, TableFormat, TableRenderer, WindowSurface,
};
use tracing::{debug, info};

/// CLI-compatible table format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTableFormat {
    /// Aligned text grids
    Pretty,
    /// One JSON document per line
    Json,
}

impl From<CliTableFormat> for TableFormat {
    fn from(cli: CliTableFormat) -> Self {
        match cli {
            CliTableFormat::Pretty => TableFormat::Pretty,
            CliTableFormat::Json => TableFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Student Scores Analysis",
    long_about = "Load a CSV of student records, print descriptive statistics, a \
                  correlation matrix and the mean exam score per attendance group, \
                  then show five charts."
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Render charts without opening windows
    #[arg(long)]
    headless: bool,

    /// Table output format
    #[arg(long, value_enum, default_value = "pretty")]
    format: CliTableFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

/// Initialize the tracing subscriber. Logs go to stderr; stdout is the report.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = PipelineConfig::builder()
        .input(args.input)
        .display(if args.headless {
            DisplayMode::Headless
        } else {
            DisplayMode::Window
        })
        .table_format(args.format.into())
        .build();
    debug!(?config, "configuration");

    let mut renderer: Box<dyn TableRenderer> = match config.table_format {
        TableFormat::Pretty => Box::new(PrettyRenderer::new(std::io::stdout())),
        TableFormat::Json => Box::new(JsonRenderer::new(std::io::stdout())),
    };
    let mut surface: Box<dyn ChartSurface> = match config.display {
        DisplayMode::Window => Box::new(WindowSurface::new(config.chart_size)),
        DisplayMode::Headless => Box::new(HeadlessSurface::new(config.chart_size)),
    };

    let outcome =
        AnalysisPipeline::new(&config, renderer.as_mut(), surface.as_mut()).run()?;
    info!(
        "Analyzed {} of {} rows, {} charts",
        outcome.rows_analyzed, outcome.rows_loaded, outcome.charts_presented
    );
    Ok(())
}
