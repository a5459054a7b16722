//! Stats module - Descriptive statistics, correlation and grouped means

mod calculator;

pub use calculator::{
    CorrelationMatrix, DescriptiveStats, GroupMean, GroupSummary, StatsCalculator,
    CONFIDENCE_LEVEL, EXAM_SCORE_COL,
};
