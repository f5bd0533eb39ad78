//! # rollsheet-core
//!
//! Core domain model for the rollsheet attendance sheet generator.
//!
//! This crate provides:
//! - Domain types: `Employee`, `Period`, `WorkWeek`, `AttendanceSheet`
//! - Sheet building: qualifying dates, header row, attendance rows
//! - Configuration: `SheetConfig` with TOML/JSON loading and validation
//! - Core traits: `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use rollsheet_core::{AttendanceSheet, Employee, SheetConfig};
//!
//! let config = SheetConfig::new(2025, 7)
//!     .employees(vec![Employee::new("EMP-001", "A")]);
//!
//! let sheet = AttendanceSheet::build(&config).unwrap();
//! assert_eq!(sheet.width(), 25);
//! assert_eq!(sheet.rows.len(), 1);
//! assert_eq!(sheet.rows[0][2], "P");
//! ```

pub mod calendar;
pub mod config;

pub use calendar::{date_labels, qualifying_dates, Period, WorkWeek};
pub use config::{load_roster, SheetConfig};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Attendance value written for every employee/date cell
pub const PRESENT_MARK: &str = "P";

/// Label of the first header column
pub const EMPLOYEE_ID_LABEL: &str = "Employee ID";

/// Label of the second header column
pub const EMPLOYEE_NAME_LABEL: &str = "Employee Name";

/// Number of identity columns preceding the date columns
pub const IDENTITY_COLUMNS: usize = 2;

// ============================================================================
// Employee
// ============================================================================

/// A roster entry
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Employee {
    /// Identifier such as `EMP-143`
    #[serde(alias = "employeeId")]
    pub employee_id: String,
    /// Display name
    pub name: String,
}

impl Employee {
    pub fn new(employee_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: name.into(),
        }
    }
}

/// Ordered list of employees; order is preserved into the sheet
pub type Roster = Vec<Employee>;

// ============================================================================
// Sheet building
// ============================================================================

/// Prepend the identity labels to the date labels
pub fn build_header(date_labels: &[String]) -> Vec<String> {
    let mut header = Vec::with_capacity(IDENTITY_COLUMNS + date_labels.len());
    header.push(EMPLOYEE_ID_LABEL.to_string());
    header.push(EMPLOYEE_NAME_LABEL.to_string());
    header.extend(date_labels.iter().cloned());
    header
}

/// Employee id, name, then one present mark per date column.
///
/// `column_count` is the full row width including the identity columns.
/// A width below the identity column count yields no marks.
pub fn build_attendance_row(employee: &Employee, column_count: usize) -> Vec<String> {
    let marks = column_count.saturating_sub(IDENTITY_COLUMNS);
    let mut row = Vec::with_capacity(IDENTITY_COLUMNS + marks);
    row.push(employee.employee_id.clone());
    row.push(employee.name.clone());
    row.extend(std::iter::repeat(PRESENT_MARK.to_string()).take(marks));
    row
}

/// A fully built worksheet: header row plus one row per employee.
///
/// Built once from a validated [`SheetConfig`] and handed to a
/// [`Renderer`]; nothing mutates it afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttendanceSheet {
    /// Worksheet name
    pub title: String,
    /// Month the sheet covers
    #[serde(skip)]
    pub period: Period,
    /// Qualifying dates, one per date column
    pub dates: Vec<NaiveDate>,
    /// Header row
    pub header: Vec<String>,
    /// Attendance rows in roster order
    pub rows: Vec<Vec<String>>,
}

impl AttendanceSheet {
    /// Validate the configuration and build the sheet
    pub fn build(config: &SheetConfig) -> Result<Self, ConfigError> {
        let period = config.validate()?;
        let dates = qualifying_dates(period, &config.work_week())?;
        let header = build_header(&date_labels(&dates));
        let width = header.len();

        let rows = config
            .employees
            .iter()
            .map(|employee| build_attendance_row(employee, width))
            .collect();

        tracing::debug!(
            period = %period.label(),
            dates = dates.len(),
            employees = config.employees.len(),
            "built attendance sheet"
        );

        Ok(Self {
            title: config.title_for(period),
            period,
            dates,
            header,
            rows,
        })
    }

    /// Number of columns in every row
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Qualifying dates, one per date column
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows including the header
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Header followed by the attendance rows
    pub fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output backend for an attendance sheet
pub trait Renderer {
    type Output;

    /// Render a sheet to the output format
    fn render(&self, sheet: &AttendanceSheet) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Year out of range: {0} (expected 1-9999)")]
    YearOutOfRange(i32),

    #[error("No working days configured")]
    NoWorkingDays,

    #[error("No qualifying dates in {period}")]
    NoQualifyingDates { period: String },

    #[error("Employee at position {index} has an empty employee id")]
    EmptyEmployeeId { index: usize },

    #[error("Invalid sheet title {title:?}: {reason}")]
    InvalidSheetTitle { title: String, reason: String },

    #[error("Unsupported roster file: {} (expected .json or .toml)", .0.display())]
    UnsupportedRosterFormat(PathBuf),

    #[error("Parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rendering or persistence error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("File write error: {}: {reason}", .path.display())]
    FileWrite { path: PathBuf, reason: String },

    #[error("Permission denied: {} (is it open in another program?)", .path.display())]
    Permission { path: PathBuf },

    #[error("Format error: {0}")]
    Format(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn july_2025(employees: Vec<Employee>) -> AttendanceSheet {
        let config = SheetConfig::new(2025, 7).employees(employees);
        AttendanceSheet::build(&config).unwrap()
    }

    #[test]
    fn header_prepends_identity_labels() {
        let header = build_header(&["2025-07-01".to_string(), "2025-07-02".to_string()]);
        assert_eq!(
            header,
            vec!["Employee ID", "Employee Name", "2025-07-01", "2025-07-02"]
        );
    }

    #[test]
    fn header_without_dates() {
        assert_eq!(build_header(&[]), vec!["Employee ID", "Employee Name"]);
    }

    #[test]
    fn attendance_row_fills_present_marks() {
        let row = build_attendance_row(&Employee::new("EMP-143", "ABDUL RAHIM J"), 5);
        assert_eq!(row, vec!["EMP-143", "ABDUL RAHIM J", "P", "P", "P"]);
    }

    #[test]
    fn attendance_row_narrower_than_identity() {
        let row = build_attendance_row(&Employee::new("EMP-1", "X"), 1);
        assert_eq!(row, vec!["EMP-1", "X"]);
    }

    #[test]
    fn july_2025_has_25_columns() {
        let sheet = july_2025(vec![Employee::new("EMP-001", "A")]);
        assert_eq!(sheet.dates().len(), 23);
        assert_eq!(sheet.dates()[0], NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(sheet.width(), 25);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.title, "July 2025 Attendance");

        let mut expected = vec!["EMP-001".to_string(), "A".to_string()];
        expected.extend(std::iter::repeat("P".to_string()).take(23));
        assert_eq!(sheet.rows[0], expected);
    }

    #[test]
    fn every_row_matches_header_width() {
        for size in [0usize, 1, 3, 10] {
            let roster = (0..size)
                .map(|i| Employee::new(format!("EMP-{i:03}"), format!("Employee {i}")))
                .collect();
            let sheet = july_2025(roster);
            assert_eq!(sheet.rows.len(), size);
            assert!(sheet.all_rows().all(|row| row.len() == sheet.width()));
        }
    }

    #[test]
    fn empty_roster_yields_header_only() {
        let sheet = july_2025(Vec::new());
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.width(), 25);
    }

    #[test]
    fn placeholder_cells_are_present_marks() {
        let sheet = july_2025(config::default_roster());
        for row in &sheet.rows {
            assert!(row[IDENTITY_COLUMNS..].iter().all(|cell| cell == PRESENT_MARK));
        }
    }

    #[test]
    fn roster_order_is_preserved() {
        let sheet = july_2025(config::default_roster());
        let ids: Vec<&str> = sheet.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["EMP-143", "EMP-017", "EMP-040"]);
    }

    #[test]
    fn build_is_deterministic() {
        let config = SheetConfig::default();
        let first = AttendanceSheet::build(&config).unwrap();
        let second = AttendanceSheet::build(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn build_rejects_invalid_month() {
        let config = SheetConfig::new(2025, 13);
        assert!(matches!(
            AttendanceSheet::build(&config),
            Err(ConfigError::InvalidMonth(13))
        ));
    }

    #[test]
    fn employee_accepts_camel_case_id() {
        let employee: Employee =
            serde_json::from_str(r#"{"employeeId": "EMP-017", "name": "HAMZA SHAHZAD"}"#).unwrap();
        assert_eq!(employee, Employee::new("EMP-017", "HAMZA SHAHZAD"));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::InvalidMonth(0).to_string(),
            "Invalid month: 0 (expected 1-12)"
        );
        let err = RenderError::FileWrite {
            path: PathBuf::from("/missing/out.xlsx"),
            reason: "directory does not exist".into(),
        };
        assert_eq!(
            err.to_string(),
            "File write error: /missing/out.xlsx: directory does not exist"
        );
    }
}
