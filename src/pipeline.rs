//! Analysis Pipeline
//!
//! Runs load, inspect, clean, summarize, group, visualize and report in
//! order. The table is owned by [`AnalysisPipeline::run`] and handed from
//! stage to stage; every statistic and chart is derived from the cleaned table.

use crate::charts::ChartFactory;
use crate::config::PipelineConfig;
use crate::data::{DataLoader, DataProcessor};
use crate::error::{PipelineError, Result};
use crate::gui::ChartSurface;
use crate::report::{self, TableRenderer};
use crate::stats::{GroupSummary, StatsCalculator};
use polars::prelude::*;
use tracing::{error, info};

/// Row and chart counts of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub rows_loaded: usize,
    pub rows_analyzed: usize,
    pub charts_presented: usize,
}

pub struct AnalysisPipeline<'a> {
    config: &'a PipelineConfig,
    renderer: &'a mut dyn TableRenderer,
    surface: &'a mut dyn ChartSurface,
}

impl<'a> AnalysisPipeline<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        renderer: &'a mut dyn TableRenderer,
        surface: &'a mut dyn ChartSurface,
    ) -> Self {
        Self {
            config,
            renderer,
            surface,
        }
    }

    /// Run every stage. A load failure stops the run before inspection.
    pub fn run(&mut self) -> Result<AnalysisOutcome> {
        let table = self.load()?;
        let rows_loaded = table.height();

        self.inspect(&table)?;
        let table = self.clean(table)?;
        self.summarize(&table)?;
        let (table, groups) = self.group_by_attendance(table)?;
        self.renderer
            .section(report::OBSERVATIONS_TITLE, report::OBSERVATIONS)?;

        let charts_presented = self.visualize(&table, &groups)?;
        self.renderer.message(report::FINAL_FINDINGS)?;
        self.renderer.message(report::COMPLETED)?;

        Ok(AnalysisOutcome {
            rows_loaded,
            rows_analyzed: table.height(),
            charts_presented,
        })
    }

    pub fn load(&mut self) -> Result<DataFrame> {
        let config = self.config;
        let path = &config.input;
        match DataLoader::load_csv(path) {
            Ok(table) => {
                self.renderer.message(report::LOADED)?;
                Ok(table)
            }
            Err(err @ PipelineError::SourceNotFound(_)) => {
                error!("{err}");
                self.renderer.message(&report::file_not_found(path))?;
                Err(err)
            }
            Err(err) => {
                error!("{err}");
                self.renderer
                    .message(&report::load_failed(path, &err.to_string()))?;
                Err(err)
            }
        }
    }

    pub fn inspect(&mut self, table: &DataFrame) -> Result<()> {
        self.renderer
            .render(report::PREVIEW_TITLE, &DataLoader::preview(table))?;

        let inspection = DataLoader::inspect(table);
        info!(
            "{} missing values across {} columns",
            inspection.total_nulls(),
            inspection.columns.len()
        );
        self.renderer
            .section(report::INFO_TITLE, &inspection.to_string())?;
        self.renderer
            .render(report::MISSING_TITLE, &inspection.missing_values()?)?;
        Ok(())
    }

    pub fn clean(&mut self, table: DataFrame) -> Result<DataFrame> {
        DataProcessor::drop_null_rows(table)
    }

    pub fn summarize(&mut self, table: &DataFrame) -> Result<()> {
        let stats = StatsCalculator::describe(table)?;
        self.renderer
            .render(report::DESCRIBE_TITLE, &StatsCalculator::describe_table(&stats)?)?;

        let correlation = StatsCalculator::correlation_matrix(table)?;
        self.renderer
            .render(report::CORRELATION_TITLE, &correlation.to_dataframe()?)?;
        Ok(())
    }

    /// Append `attendance_group` and show mean exam score per group.
    pub fn group_by_attendance(&mut self, table: DataFrame) -> Result<(DataFrame, GroupSummary)> {
        let table = DataProcessor::add_attendance_group(table)?;
        let groups = StatsCalculator::group_means(&table)?;
        self.renderer
            .render(report::GROUP_TITLE, &groups.to_dataframe()?)?;
        Ok((table, groups))
    }

    /// Present the five charts one after another.
    pub fn visualize(&mut self, table: &DataFrame, groups: &GroupSummary) -> Result<usize> {
        let charts = ChartFactory::build_all(table, groups, self.config.histogram_bins)?;
        for chart in &charts {
            self.surface.present(chart)?;
        }
        info!("Presented {} charts", charts.len());
        Ok(charts.len())
    }
}
