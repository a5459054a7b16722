//! Statistics Calculator Module
//! Handles descriptive statistics, Pearson correlation and grouped means.

use crate::data::{AttendanceGroup, DataLoader, DataProcessor, ATTENDANCE_GROUP_COL};
use crate::error::Result;
use polars::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::debug;

/// Column whose mean is reported per attendance group.
pub const EXAM_SCORE_COL: &str = "exam_score";

/// Coverage of the interval drawn around each group mean.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Row labels of the descriptive statistics table.
pub const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Descriptive statistics for a single column.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl DescriptiveStats {
    fn as_row(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Pairwise Pearson coefficients between numeric columns.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        Some(self.values[i][j])
    }

    /// Square table with a leading `column` name column.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new("column".into(), self.columns.clone()));
        for (j, name) in self.columns.iter().enumerate() {
            let values: Vec<f64> = self.values.iter().map(|row| row[j]).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Mean exam score of one attendance group.
#[derive(Debug, Clone)]
pub struct GroupMean {
    pub group: AttendanceGroup,
    pub count: usize,
    pub mean: f64,
    /// Confidence interval of the mean, absent below two rows.
    pub ci: Option<(f64, f64)>,
}

/// One row per non-empty attendance group, ordered Low, Medium, High.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub rows: Vec<GroupMean>,
}

impl GroupSummary {
    pub fn mean_of(&self, group: AttendanceGroup) -> Option<f64> {
        self.rows.iter().find(|r| r.group == group).map(|r| r.mean)
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let labels: Vec<&str> = self.rows.iter().map(|r| r.group.label()).collect();
        let means: Vec<f64> = self.rows.iter().map(|r| r.mean).collect();
        Ok(DataFrame::new(vec![
            Column::new(ATTENDANCE_GROUP_COL.into(), labels),
            Column::new(EXAM_SCORE_COL.into(), means),
        ])?)
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        DescriptiveStats {
            column: String::new(),
            count: n,
            mean: values.iter().mean(),
            // Sample std: NaN for a single observation.
            std: values.iter().std_dev(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Descriptive statistics for every numeric column, in table order.
    pub fn describe(df: &DataFrame) -> Result<Vec<DescriptiveStats>> {
        DataLoader::numeric_columns(df)
            .into_iter()
            .map(|name| -> Result<DescriptiveStats> {
                let values = DataLoader::column_values(df, &name)?;
                let mut stats = Self::compute_descriptive_stats(&values);
                stats.column = name;
                Ok(stats)
            })
            .collect()
    }

    /// Lay out descriptive statistics with one row per measure.
    pub fn describe_table(stats: &[DescriptiveStats]) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(stats.len() + 1);
        columns.push(Column::new("statistic".into(), DESCRIBE_ROWS.to_vec()));
        for s in stats {
            columns.push(Column::new(s.column.as_str().into(), s.as_row().to_vec()));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Pearson correlation coefficient of two equally long samples.
    ///
    /// NaN when either sample has zero variance or fewer than two values.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len().min(y.len());
        if n < 2 {
            return f64::NAN;
        }
        let (x, y) = (&x[..n], &y[..n]);

        let cov = x.iter().covariance(y.iter());
        let denom = x.iter().std_dev() * y.iter().std_dev();
        if denom == 0.0 || !denom.is_finite() {
            return f64::NAN;
        }
        (cov / denom).clamp(-1.0, 1.0)
    }

    /// Pearson correlation matrix restricted to numeric columns.
    pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
        let columns = DataLoader::numeric_columns(df);
        let series: Vec<Vec<Option<f64>>> = columns
            .iter()
            .map(|name| -> Result<Vec<Option<f64>>> {
                let as_f64 = df.column(name)?.cast(&DataType::Float64)?;
                Ok(as_f64.f64()?.into_iter().collect())
            })
            .collect::<Result<_>>()?;

        let size = columns.len();
        let mut values = vec![vec![f64::NAN; size]; size];

        for i in 0..size {
            for j in i..size {
                // Pairwise complete observations.
                let (x, y): (Vec<f64>, Vec<f64>) = series[i]
                    .iter()
                    .zip(series[j].iter())
                    .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                    .unzip();

                let r = if i == j {
                    let std = x.iter().std_dev();
                    if std > 0.0 {
                        1.0
                    } else {
                        f64::NAN
                    }
                } else {
                    Self::pearson(&x, &y)
                };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        debug!("Computed {size}x{size} correlation matrix");
        Ok(CorrelationMatrix { columns, values })
    }

    /// Two-sided Student-t confidence interval of the mean.
    pub fn mean_confidence_interval(values: &[f64], level: f64) -> Option<(f64, f64)> {
        let n = values.len();
        if n < 2 {
            return None;
        }

        let mean = values.iter().mean();
        let std = values.iter().std_dev();
        let dist = StudentsT::new(0.0, 1.0, (n - 1) as f64).ok()?;
        let t = dist.inverse_cdf(0.5 + level / 2.0);
        let half_width = t * std / (n as f64).sqrt();
        if !half_width.is_finite() {
            return None;
        }
        Some((mean - half_width, mean + half_width))
    }

    /// Mean exam score per attendance group, empty groups left out.
    pub fn group_means(df: &DataFrame) -> Result<GroupSummary> {
        let mut by_group: BTreeMap<AttendanceGroup, Vec<f64>> = BTreeMap::new();
        for (group, score) in DataProcessor::grouped_values(df, EXAM_SCORE_COL)? {
            by_group.entry(group).or_default().push(score);
        }

        let rows = by_group
            .into_iter()
            .map(|(group, scores)| GroupMean {
                group,
                count: scores.len(),
                mean: scores.iter().mean(),
                ci: Self::mean_confidence_interval(&scores, CONFIDENCE_LEVEL),
            })
            .collect();

        Ok(GroupSummary { rows })
    }
}
