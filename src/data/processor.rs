//! Data Processor Module
//! Handles data cleaning and the attendance group derivation.

use crate::data::DataLoader;
use crate::error::Result;
use polars::prelude::*;
use std::fmt;
use tracing::info;

pub const ATTENDANCE_COL: &str = "attendance_percent";
pub const ATTENDANCE_GROUP_COL: &str = "attendance_group";

/// Attendance range of a student. Ordered Low < Medium < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttendanceGroup {
    Low,
    Medium,
    High,
}

impl AttendanceGroup {
    pub const ALL: [AttendanceGroup; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Bin an attendance percentage into (0,60], (60,80] or (80,100].
    ///
    /// Anything outside (0,100], including NaN, has no group.
    pub fn from_percent(percent: f64) -> Option<Self> {
        if percent > 0.0 && percent <= 60.0 {
            Some(Self::Low)
        } else if percent > 60.0 && percent <= 80.0 {
            Some(Self::Medium)
        } else if percent > 80.0 && percent <= 100.0 {
            Some(Self::High)
        } else {
            None
        }
    }
}

impl fmt::Display for AttendanceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Drop every row holding a null in any column.
    pub fn drop_null_rows(df: DataFrame) -> Result<DataFrame> {
        let before = df.height();
        let cleaned = df.drop_nulls::<String>(None)?;
        info!(
            "Dropped {} rows with missing values ({} remain)",
            before - cleaned.height(),
            cleaned.height()
        );
        Ok(cleaned)
    }

    /// Bin every row's attendance, in row order.
    pub fn attendance_groups(df: &DataFrame) -> Result<Vec<Option<AttendanceGroup>>> {
        DataLoader::require_numeric(df, &[ATTENDANCE_COL])?;
        let column = df.column(ATTENDANCE_COL)?;

        let as_f64 = column.cast(&DataType::Float64)?;
        let groups = as_f64
            .f64()?
            .into_iter()
            .map(|v| v.and_then(AttendanceGroup::from_percent))
            .collect();
        Ok(groups)
    }

    /// Enum dtype whose categories are the group labels, Low first.
    pub fn attendance_group_dtype() -> Result<DataType> {
        let labels = Series::new(
            ATTENDANCE_GROUP_COL.into(),
            AttendanceGroup::ALL.map(AttendanceGroup::label),
        );
        let categorical = labels.cast(&DataType::Categorical(None, CategoricalOrdering::Physical))?;
        let rev_map = categorical.categorical()?.get_rev_map().clone();
        Ok(DataType::Enum(Some(rev_map), CategoricalOrdering::Physical))
    }

    /// Append the `attendance_group` column as an ordered enum.
    pub fn add_attendance_group(mut df: DataFrame) -> Result<DataFrame> {
        let labels: Vec<Option<&str>> = Self::attendance_groups(&df)?
            .into_iter()
            .map(|g| g.map(AttendanceGroup::label))
            .collect();

        let column = Column::new(ATTENDANCE_GROUP_COL.into(), labels)
            .cast(&Self::attendance_group_dtype()?)?;
        df.with_column(column)?;
        Ok(df)
    }

    /// Pair each row's attendance group with a numeric value column.
    ///
    /// Rows without a group or without a value are skipped.
    pub fn grouped_values(
        df: &DataFrame,
        value_col: &str,
    ) -> Result<Vec<(AttendanceGroup, f64)>> {
        DataLoader::require_numeric(df, &[value_col])?;
        let groups = Self::attendance_groups(df)?;
        let values = df.column(value_col)?.cast(&DataType::Float64)?;

        let pairs = groups
            .into_iter()
            .zip(values.f64()?.into_iter())
            .filter_map(|(g, v)| Some((g?, v?)))
            .collect();
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binning_boundaries_are_right_closed() {
        assert_eq!(AttendanceGroup::from_percent(60.0), Some(AttendanceGroup::Low));
        assert_eq!(
            AttendanceGroup::from_percent(60.0001),
            Some(AttendanceGroup::Medium)
        );
        assert_eq!(
            AttendanceGroup::from_percent(80.0),
            Some(AttendanceGroup::Medium)
        );
        assert_eq!(
            AttendanceGroup::from_percent(80.0001),
            Some(AttendanceGroup::High)
        );
        assert_eq!(AttendanceGroup::from_percent(100.0), Some(AttendanceGroup::High));
        assert_eq!(AttendanceGroup::from_percent(0.5), Some(AttendanceGroup::Low));
    }

    #[test]
    fn values_outside_the_bins_have_no_group() {
        assert_eq!(AttendanceGroup::from_percent(0.0), None);
        assert_eq!(AttendanceGroup::from_percent(-5.0), None);
        assert_eq!(AttendanceGroup::from_percent(100.5), None);
        assert_eq!(AttendanceGroup::from_percent(f64::NAN), None);
    }

    #[test]
    fn groups_order_by_label_order() {
        let mut groups = vec![
            AttendanceGroup::High,
            AttendanceGroup::Low,
            AttendanceGroup::Medium,
        ];
        groups.sort();
        assert_eq!(groups, AttendanceGroup::ALL.to_vec());
    }

    #[test]
    fn drop_null_rows_removes_only_incomplete_rows() {
        let df = df!(
            "a" => [Some(1.0), None, Some(3.0), Some(4.0)],
            "b" => [Some("x"), Some("y"), None, Some("z")]
        )
        .unwrap();

        let cleaned = DataProcessor::drop_null_rows(df).unwrap();
        assert_eq!(cleaned.height(), 2);
        let a: Vec<f64> = cleaned.column("a").unwrap().f64().unwrap().into_no_null_iter().collect();
        assert_eq!(a, vec![1.0, 4.0]);
    }

    #[test]
    fn drop_null_rows_is_idempotent() {
        let df = df!(
            "a" => [Some(1.0), None, Some(3.0)],
            "b" => [Some(1i64), Some(2), None]
        )
        .unwrap();

        let once = DataProcessor::drop_null_rows(df).unwrap();
        let twice = DataProcessor::drop_null_rows(once.clone()).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn drop_null_rows_without_nulls_is_a_no_op() {
        let df = df!("a" => [1.0, 2.0], "b" => ["x", "y"]).unwrap();
        let cleaned = DataProcessor::drop_null_rows(df.clone()).unwrap();
        assert!(df.equals(&cleaned));
    }

    #[test]
    fn attendance_group_column_is_appended() {
        let df = df!(
            "attendance_percent" => [90.0, 50.0, 70.0, 0.0],
            "exam_score" => [75.0, 55.0, 65.0, 10.0]
        )
        .unwrap();

        let df = DataProcessor::add_attendance_group(df).unwrap();
        assert_eq!(df.width(), 3);

        let group = df.column(ATTENDANCE_GROUP_COL).unwrap();
        assert!(matches!(group.dtype(), DataType::Enum(Some(_), _)));
        let as_text = group.cast(&DataType::String).unwrap();
        let labels: Vec<Option<&str>> = as_text.str().unwrap().into_iter().collect();
        assert_eq!(labels, vec![Some("High"), Some("Low"), Some("Medium"), None]);
    }

    #[test]
    fn attendance_group_categories_follow_group_order() {
        let dtype = DataProcessor::attendance_group_dtype().unwrap();
        let DataType::Enum(Some(rev_map), _) = &dtype else {
            panic!("expected an enum dtype, got {dtype:?}");
        };
        let categories: Vec<&str> = (0..rev_map.len() as u32).map(|i| rev_map.get(i)).collect();
        assert_eq!(categories, vec!["Low", "Medium", "High"]);
    }

    #[test]
    fn grouped_values_skip_ungrouped_rows() {
        let df = df!(
            "attendance_percent" => [90.0, 120.0, 50.0],
            "exam_score" => [75.0, 99.0, 55.0]
        )
        .unwrap();

        let pairs = DataProcessor::grouped_values(&df, "exam_score").unwrap();
        assert_eq!(
            pairs,
            vec![(AttendanceGroup::High, 75.0), (AttendanceGroup::Low, 55.0)]
        );
    }
}
