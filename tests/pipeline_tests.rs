//! Integration tests for the analysis pipeline.
//!
//! These tests run the pipeline end to end over CSV fixtures, with a chart
//! surface that records what it was given instead of opening windows.

use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::fmt::Write as _;
use std::path::PathBuf;
use student_scores::charts::Chart;
use student_scores::data::{AttendanceGroup, DataLoader, DataProcessor};
use student_scores::report;
use student_scores::stats::StatsCalculator;
use student_scores::{
    AnalysisPipeline, ChartSurface, DisplayMode, HeadlessSurface, JsonRenderer, PipelineConfig,
    PipelineError, PrettyRenderer,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(filename: &str) -> DataFrame {
    DataLoader::load_csv(&fixtures_path().join(filename)).expect("Failed to read CSV file")
}

#[derive(Default)]
struct RecordingSurface {
    titles: Vec<String>,
    line_points: Vec<(f64, f64)>,
}

impl ChartSurface for RecordingSurface {
    fn present(&mut self, chart: &Chart) -> student_scores::Result<()> {
        if let Chart::Line(line) = chart {
            self.line_points = line.points.clone();
        }
        self.titles.push(chart.title().to_string());
        Ok(())
    }
}

fn run_pretty(
    filename: &str,
) -> (
    student_scores::Result<student_scores::AnalysisOutcome>,
    String,
    RecordingSurface,
) {
    let config = PipelineConfig::builder()
        .input(fixtures_path().join(filename))
        .build();
    let mut renderer = PrettyRenderer::new(Vec::new());
    let mut surface = RecordingSurface::default();

    let result = AnalysisPipeline::new(&config, &mut renderer, &mut surface).run();
    let output = String::from_utf8(renderer.into_inner()).expect("utf-8 output");
    (result, output, surface)
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("missing {needle:?} in output"))
}

// ============================================================================
// Full Pipeline
// ============================================================================

#[test]
fn test_full_pipeline_prints_sections_in_order() {
    let (result, output, _) = run_pretty("student_scores.csv");
    let outcome = result.expect("pipeline should succeed");

    assert_eq!(outcome.rows_loaded, 20);
    assert_eq!(outcome.rows_analyzed, 20);
    assert_eq!(outcome.charts_presented, 5);

    let order = [
        report::LOADED,
        report::PREVIEW_TITLE,
        report::INFO_TITLE,
        report::MISSING_TITLE,
        report::DESCRIBE_TITLE,
        report::CORRELATION_TITLE,
        report::GROUP_TITLE,
        report::OBSERVATIONS_TITLE,
        "📘 FINAL FINDINGS:",
        "✅ Analysis and Visualization Completed Successfully!",
    ];
    let positions: Vec<usize> = order.iter().map(|s| position(&output, s)).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn test_full_pipeline_presents_five_charts() {
    let (_, _, surface) = run_pretty("student_scores.csv");

    assert_eq!(
        surface.titles,
        vec![
            "Distribution of Exam Scores",
            "Relationship: Hours Studied vs Exam Score",
            "Relationship: Sleep Hours vs Exam Score",
            "Average Exam Score by Attendance Level",
            "Trend Between Hours Studied and Exam Scores",
        ]
    );
}

#[test]
fn test_line_chart_is_not_sorted() {
    let (_, _, surface) = run_pretty("student_scores.csv");

    let xs: Vec<f64> = surface.line_points.iter().map(|p| p.0).collect();
    assert_eq!(&xs[..4], &[8.0, 1.3, 4.0, 3.5]);
    assert!(xs.windows(2).any(|w| w[1] < w[0]));
}

#[test]
fn test_findings_are_printed_verbatim() {
    let (_, output, _) = run_pretty("student_scores.csv");

    assert!(output.contains(report::OBSERVATIONS));
    assert!(output.contains(report::FINAL_FINDINGS));
    assert!(output.ends_with("✅ Analysis and Visualization Completed Successfully!\n"));
}

// ============================================================================
// Load Failure
// ============================================================================

#[test]
fn test_missing_file_stops_before_analysis() {
    let (result, output, surface) = run_pretty("does_not_exist.csv");

    assert!(matches!(result, Err(PipelineError::SourceNotFound(_))));
    assert!(output.contains("❌ File not found. Please ensure '"));
    assert!(output.contains("does_not_exist.csv' is in your working directory."));
    assert!(!output.contains(report::PREVIEW_TITLE));
    assert!(!output.contains(report::DESCRIBE_TITLE));
    assert!(surface.titles.is_empty());
}

#[test]
fn test_unparseable_cell_fails_load() {
    let err = DataLoader::load_csv(&fixtures_path().join("bad_score.csv")).unwrap_err();
    assert!(matches!(err, PipelineError::Polars(_)), "got {err:?}");

    let (result, output, surface) = run_pretty("bad_score.csv");
    assert!(matches!(result, Err(PipelineError::Polars(_))));
    assert!(output.contains("❌ Could not read '"));
    assert!(!output.contains(report::LOADED));
    assert!(!output.contains(report::PREVIEW_TITLE));
    assert!(surface.titles.is_empty());
}

#[test]
fn test_unparseable_cell_after_inference_window_fails_load() {
    let mut csv =
        String::from("hours_studied,attendance_percent,sleep_hours,previous_scores,exam_score\n");
    for _ in 0..10_001 {
        csv.push_str("5,90,7,70,75\n");
    }
    writeln!(csv, "3,90,7,70,abc").unwrap();

    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("late_bad_score.csv");
    std::fs::write(&path, csv).unwrap();

    let result = DataLoader::load_csv(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(PipelineError::Polars(_))));
}

#[test]
fn test_empty_score_column_stays_numeric() {
    let df = load("empty_attendance.csv");

    let attendance = df.column("attendance_percent").unwrap();
    assert_eq!(attendance.dtype(), &DataType::Float64);
    assert_eq!(attendance.null_count(), 3);
    assert!(DataLoader::numeric_columns(&df).contains(&"attendance_percent".to_string()));

    let stats = StatsCalculator::describe(&df).unwrap();
    let attendance_stats = stats
        .iter()
        .find(|s| s.column == "attendance_percent")
        .expect("attendance described");
    assert_eq!(attendance_stats.count, 0);
}

// ============================================================================
// Cleaning
// ============================================================================

#[test]
fn test_na_markers_are_read_as_missing() {
    let df = load("with_missing.csv");
    let report = DataLoader::inspect(&df);

    assert_eq!(df.height(), 8);
    let nulls: Vec<usize> = report.columns.iter().map(|c| c.nulls).collect();
    assert_eq!(nulls, vec![1, 1, 1, 0, 0, 1]);
}

#[test]
fn test_cleaning_drops_every_incomplete_row() {
    let df = load("with_missing.csv");
    let cleaned = DataProcessor::drop_null_rows(df).unwrap();

    assert_eq!(cleaned.height(), 4);
    assert_eq!(DataLoader::inspect(&cleaned).total_nulls(), 0);
    let ids: Vec<&str> = cleaned
        .column("student_id")
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(ids, vec!["S001", "S003", "S005", "S008"]);

    let again = DataProcessor::drop_null_rows(cleaned.clone()).unwrap();
    assert!(cleaned.equals(&again));
}

#[test]
fn test_pipeline_analyzes_cleaned_rows_only() {
    let (result, _, _) = run_pretty("with_missing.csv");
    let outcome = result.unwrap();

    assert_eq!(outcome.rows_loaded, 8);
    assert_eq!(outcome.rows_analyzed, 4);
}

// ============================================================================
// Grouping and Statistics
// ============================================================================

#[test]
fn test_two_students_group_means() {
    let df = DataProcessor::drop_null_rows(load("two_students.csv")).unwrap();
    let summary = StatsCalculator::group_means(&df).unwrap();

    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.mean_of(AttendanceGroup::High), Some(75.0));
    assert_eq!(summary.mean_of(AttendanceGroup::Low), Some(55.0));
    assert_eq!(summary.mean_of(AttendanceGroup::Medium), None);
}

#[test]
fn test_group_table_as_json() {
    let config = PipelineConfig::builder()
        .input(fixtures_path().join("two_students.csv"))
        .build();
    let mut renderer = JsonRenderer::new(Vec::new());
    let mut surface = RecordingSurface::default();
    AnalysisPipeline::new(&config, &mut renderer, &mut surface)
        .run()
        .unwrap();

    let output = String::from_utf8(renderer.into_inner()).unwrap();
    let group_doc: serde_json::Value = output
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .find(|doc| doc["title"] == report::GROUP_TITLE)
        .expect("group table emitted");

    assert_eq!(
        group_doc["rows"],
        serde_json::json!([
            { "attendance_group": "Low", "exam_score": 55.0 },
            { "attendance_group": "High", "exam_score": 75.0 },
        ])
    );
}

#[test]
fn test_group_counts_cover_all_students() {
    let df = load("student_scores.csv");
    let summary = StatsCalculator::group_means(&df).unwrap();

    let groups: Vec<AttendanceGroup> = summary.rows.iter().map(|r| r.group).collect();
    assert_eq!(groups, AttendanceGroup::ALL.to_vec());
    let counts: Vec<usize> = summary.rows.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![4, 9, 7]);
    assert!((summary.rows[0].mean - 26.375).abs() < 1e-9);
}

#[test]
fn test_single_row_std_is_nan() {
    let df = load("single_row.csv");
    let stats = StatsCalculator::describe(&df).unwrap();

    assert_eq!(stats.len(), 5);
    assert!(stats.iter().all(|s| s.std.is_nan()));

    let (result, _, surface) = run_pretty("single_row.csv");
    assert_eq!(result.unwrap().charts_presented, 5);
    assert_eq!(surface.titles.len(), 5);
}

#[test]
fn test_correlation_matrix_over_fixture() {
    let df = load("student_scores.csv");
    let matrix = StatsCalculator::correlation_matrix(&df).unwrap();

    assert_eq!(
        matrix.columns,
        vec![
            "hours_studied",
            "sleep_hours",
            "attendance_percent",
            "previous_scores",
            "exam_score"
        ]
    );
    for (i, row) in matrix.values.iter().enumerate() {
        assert!((row[i] - 1.0).abs() < 1e-12);
        for (j, value) in row.iter().enumerate() {
            assert!((value - matrix.values[j][i]).abs() < 1e-12);
        }
    }
    assert!(matrix.get("hours_studied", "exam_score").unwrap() > 0.5);
}

// ============================================================================
// Headless Rendering
// ============================================================================

fn run_headless(
    filename: &str,
) -> (student_scores::Result<student_scores::AnalysisOutcome>, usize) {
    let config = PipelineConfig::builder()
        .input(fixtures_path().join(filename))
        .display(DisplayMode::Headless)
        .build();
    let mut renderer = PrettyRenderer::new(Vec::new());
    let mut surface = HeadlessSurface::new(config.chart_size);

    let result = AnalysisPipeline::new(&config, &mut renderer, &mut surface).run();
    (result, surface.rendered())
}

#[test]
fn test_headless_run_renders_every_chart() {
    let (result, rendered) = run_headless("student_scores.csv");
    assert_eq!(result.unwrap().charts_presented, 5);
    assert_eq!(rendered, 5);
}

#[test]
fn test_headless_run_renders_single_row() {
    let (result, rendered) = run_headless("single_row.csv");
    assert_eq!(result.unwrap().charts_presented, 5);
    assert_eq!(rendered, 5);
}
