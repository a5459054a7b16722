//! Data module - CSV loading, inspection and cleaning

mod loader;
mod processor;

pub use loader::{is_numeric_dtype, ColumnInfo, DataLoader, InspectionReport};
pub use processor::{AttendanceGroup, DataProcessor, ATTENDANCE_COL, ATTENDANCE_GROUP_COL};
