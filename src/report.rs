//! Report Module
//! Fixed narrative text and the table renderers that write everything to stdout.

use crate::error::Result;
use polars::prelude::*;
use serde_json::{json, Map, Value};
use std::io::Write;
use std::path::Path;

pub const LOADED: &str = "✅ Dataset loaded successfully!";
pub const PREVIEW_TITLE: &str = "📊 First 5 rows of the dataset:";
pub const INFO_TITLE: &str = "📋 Dataset Info:";
pub const MISSING_TITLE: &str = "🔍 Missing Values per Column:";
pub const DESCRIBE_TITLE: &str = "📊 Descriptive Statistics:";
pub const CORRELATION_TITLE: &str = "🔗 Correlation Matrix:";
pub const GROUP_TITLE: &str = "🎯 Average Exam Score by Attendance Group:";
pub const OBSERVATIONS_TITLE: &str = "💡 Observations:";

pub const OBSERVATIONS: &str = "
- Students with higher attendance tend to score better in exams.
- 'Hours studied' appears positively related to 'exam_score'.
- 'Sleep hours' and 'exam_score' may have a mild relationship (balance matters).
";

pub const FINAL_FINDINGS: &str = "
📘 FINAL FINDINGS:
-------------------
1. Students who study longer hours generally achieve higher exam scores.
2. Moderate sleep (around 7–8 hours) seems beneficial for performance.
3. Attendance plays a strong role — students with 80–100% attendance show higher average scores.
4. Positive correlation observed between 'previous_scores' and 'exam_score', suggesting consistent learners.
";

pub const COMPLETED: &str = "\n✅ Analysis and Visualization Completed Successfully!";

pub fn file_not_found(path: &Path) -> String {
    format!(
        "❌ File not found. Please ensure '{}' is in your working directory.",
        path.display()
    )
}

pub fn load_failed(path: &Path, reason: &str) -> String {
    format!("❌ Could not read '{}': {reason}", path.display())
}

/// Writes pipeline output: titled tables, titled text blocks and plain lines.
pub trait TableRenderer {
    fn render(&mut self, title: &str, table: &DataFrame) -> Result<()>;
    fn section(&mut self, title: &str, body: &str) -> Result<()>;
    fn message(&mut self, text: &str) -> Result<()>;
}

/// Human-readable grids, using polars' table formatting.
pub struct PrettyRenderer<W: Write> {
    out: W,
}

impl<W: Write> PrettyRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TableRenderer for PrettyRenderer<W> {
    fn render(&mut self, title: &str, table: &DataFrame) -> Result<()> {
        writeln!(self.out, "\n{title}")?;
        writeln!(self.out, "{table}")?;
        Ok(())
    }

    fn section(&mut self, title: &str, body: &str) -> Result<()> {
        writeln!(self.out, "\n{title}")?;
        writeln!(self.out, "{body}")?;
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }
}

/// One JSON document per line.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, value: &Value) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> TableRenderer for JsonRenderer<W> {
    fn render(&mut self, title: &str, table: &DataFrame) -> Result<()> {
        let doc = json!({
            "kind": "table",
            "title": title,
            "columns": table
                .get_column_names()
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>(),
            "rows": table_rows(table)?,
        });
        self.emit(&doc)
    }

    fn section(&mut self, title: &str, body: &str) -> Result<()> {
        self.emit(&json!({ "kind": "text", "title": title, "text": body.trim() }))
    }

    fn message(&mut self, text: &str) -> Result<()> {
        self.emit(&json!({ "kind": "text", "text": text.trim() }))
    }
}

fn table_rows(table: &DataFrame) -> Result<Vec<Value>> {
    let mut rows = Vec::with_capacity(table.height());
    for idx in 0..table.height() {
        let mut row = Map::new();
        for column in table.get_columns() {
            row.insert(column.name().to_string(), any_value_to_json(column.get(idx)?));
        }
        rows.push(Value::Object(row));
    }
    Ok(rows)
}

/// NaN and infinities become `null`; categorical cells become their label.
fn any_value_to_json(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => json!(v),
        AnyValue::String(v) => json!(v),
        AnyValue::StringOwned(v) => json!(v.as_str()),
        AnyValue::Int8(v) => json!(v),
        AnyValue::Int16(v) => json!(v),
        AnyValue::Int32(v) => json!(v),
        AnyValue::Int64(v) => json!(v),
        AnyValue::UInt8(v) => json!(v),
        AnyValue::UInt16(v) => json!(v),
        AnyValue::UInt32(v) => json!(v),
        AnyValue::UInt64(v) => json!(v),
        AnyValue::Float32(v) => json!(v),
        AnyValue::Float64(v) => json!(v),
        other => match other.get_str() {
            Some(label) => json!(label),
            None => Value::String(other.to_string()),
        },
    }
}
