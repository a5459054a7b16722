//! CSV Data Loader Module
//! Handles CSV file loading, column extraction and structural inspection using Polars.

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Cell values read as missing, on top of empty fields.
pub const NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Columns the analysis reads as numbers.
pub const NUMERIC_COLUMNS: [&str; 5] = [
    "hours_studied",
    "sleep_hours",
    "attendance_percent",
    "previous_scores",
    "exam_score",
];

/// Number of rows shown by the dataset preview.
pub const PREVIEW_ROWS: usize = 5;

/// Per-column structure line of an [`InspectionReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
    pub nulls: usize,
}

/// Shape, types and null counts of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionReport {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
    pub estimated_bytes: usize,
}

impl InspectionReport {
    /// Per-column missing value counts as a two-column table.
    pub fn missing_values(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let nulls: Vec<u64> = self.columns.iter().map(|c| c.nulls as u64).collect();

        let df = DataFrame::new(vec![
            Column::new("column".into(), names),
            Column::new("missing".into(), nulls),
        ])?;
        Ok(df)
    }

    pub fn total_nulls(&self) -> usize {
        self.columns.iter().map(|c| c.nulls).sum()
    }
}

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(6)
            .max(6);

        if self.rows == 0 {
            writeln!(f, "RangeIndex: 0 entries")?;
        } else {
            writeln!(f, "RangeIndex: {} entries, 0 to {}", self.rows, self.rows - 1)?;
        }
        writeln!(f, "Data columns (total {} columns):", self.columns.len())?;
        writeln!(
            f,
            " {:<3} {:<name_width$}  {:<14}  {}",
            "#", "Column", "Non-Null Count", "Dtype"
        )?;
        writeln!(
            f,
            " {:<3} {:<name_width$}  {:<14}  {}",
            "---", "------", "--------------", "-----"
        )?;
        for (idx, column) in self.columns.iter().enumerate() {
            writeln!(
                f,
                " {:<3} {:<name_width$}  {:<14}  {}",
                idx,
                column.name,
                format!("{} non-null", column.non_null),
                column.dtype
            )?;
        }

        let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
        for column in &self.columns {
            *tally.entry(column.dtype.as_str()).or_default() += 1;
        }
        let dtypes: Vec<String> = tally
            .iter()
            .map(|(dtype, count)| format!("{dtype}({count})"))
            .collect();
        writeln!(f, "dtypes: {}", dtypes.join(", "))?;
        write!(f, "memory usage: {}", format_bytes(self.estimated_bytes))
    }
}

fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} bytes")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

/// Check whether a dtype holds plain numbers.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file using Polars.
    ///
    /// Cells that cannot be parsed fail the load. Score columns inferred as
    /// text (all empty, or holding a stray word) are re-read as `Float64`,
    /// so an empty column stays numeric and a stray word is a parse error.
    pub fn load_csv(path: &Path) -> Result<DataFrame> {
        if !path.exists() {
            return Err(PipelineError::SourceNotFound(path.to_path_buf()));
        }

        info!("Loading dataset from: {}", path.display());
        let inferred = Self::csv_reader(path, None)?.collect_schema()?;

        let mut overwrite = Schema::with_capacity(NUMERIC_COLUMNS.len());
        for name in NUMERIC_COLUMNS {
            if matches!(inferred.get(name), Some(DataType::String)) {
                debug!(column = name, "reading text-typed score column as Float64");
                overwrite.with_column(name.into(), DataType::Float64);
            }
        }
        let overwrite = (!overwrite.is_empty()).then(|| Arc::new(overwrite));

        let df = Self::csv_reader(path, overwrite)?.collect()?;

        info!("Dataset loaded: {:?}", df.shape());
        Ok(df)
    }

    fn csv_reader(path: &Path, overwrite: Option<SchemaRef>) -> Result<LazyFrame> {
        let na_values: Vec<PlSmallStr> = NA_VALUES.iter().map(|s| (*s).into()).collect();

        let lf = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_null_values(Some(NullValues::AllColumns(na_values)))
            .with_dtype_overwrite(overwrite)
            .finish()?;
        Ok(lf)
    }

    /// First rows of the table, fewer when the table is shorter.
    pub fn preview(df: &DataFrame) -> DataFrame {
        df.head(Some(PREVIEW_ROWS))
    }

    /// Collect shape, dtype and null counts for every column.
    pub fn inspect(df: &DataFrame) -> InspectionReport {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| {
                let nulls = col.null_count();
                ColumnInfo {
                    name: col.name().to_string(),
                    dtype: col.dtype().to_string(),
                    non_null: col.len() - nulls,
                    nulls,
                }
            })
            .collect();

        InspectionReport {
            rows: df.height(),
            columns,
            estimated_bytes: df.estimated_size(),
        }
    }

    /// Get list of numeric column names, in table order.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Non-null values of a numeric column as `f64`, in row order.
    pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let column = df
            .column(name)
            .map_err(|_| PipelineError::ColumnNotFound(name.to_string()))?;
        if !is_numeric_dtype(column.dtype()) {
            return Err(PipelineError::NonNumericColumn(name.to_string()));
        }

        let as_f64 = column.cast(&DataType::Float64)?;
        let values: Vec<f64> = as_f64.f64()?.into_iter().flatten().collect();
        debug!(column = name, count = values.len(), "extracted column values");
        Ok(values)
    }

    /// Verify that every named column exists and is numeric.
    pub fn require_numeric(df: &DataFrame, names: &[&str]) -> Result<()> {
        for name in names {
            let column = df
                .column(name)
                .map_err(|_| PipelineError::ColumnNotFound(name.to_string()))?;
            if !is_numeric_dtype(column.dtype()) {
                return Err(PipelineError::NonNumericColumn(name.to_string()));
            }
        }
        Ok(())
    }
}
