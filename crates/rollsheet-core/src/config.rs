//! Sheet configuration
//!
//! Every option is optional in a config file. The defaults produce the
//! July 2025 sheet: a three-person sample roster, Monday to Friday, output
//! `attendance_july_2025.xlsx` in the current directory and sheet title
//! `July 2025 Attendance`.
//!
//! ```toml
//! year = 2025
//! month = 7
//! output_path = "out/attendance.xlsx"
//! working_days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
//! holidays = ["2025-07-04"]
//!
//! [[employees]]
//! employee_id = "EMP-143"
//! name = "ABDUL RAHIM J"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calendar::{Period, WorkWeek, MONDAY_TO_FRIDAY};
use crate::{ConfigError, Employee, Roster};

/// Maximum worksheet name length accepted by spreadsheet applications
pub const MAX_SHEET_TITLE_LEN: usize = 31;

const FORBIDDEN_TITLE_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

const SAMPLE_TOML: &str = r#"# rollsheet configuration
#
# Every key is optional. Command-line flags override these values.

year = 2025
month = 7

# Weekdays that get a date column (Mon, Tue, Wed, Thu, Fri, Sat, Sun)
working_days = ["Mon", "Tue", "Wed", "Thu", "Fri"]

# Dates to leave out even when they fall on a working day
holidays = []

# Defaults to attendance_<month>_<year>.xlsx in the current directory
# output_path = "attendance_july_2025.xlsx"

# Defaults to "<Month> <year> Attendance"
# sheet_title = "July 2025 Attendance"

[[employees]]
employee_id = "EMP-143"
name = "ABDUL RAHIM J"

[[employees]]
employee_id = "EMP-017"
name = "HAMZA SHAHZAD"

[[employees]]
employee_id = "EMP-040"
name = "MAHIN KHAN"
"#;

/// The sample roster used when no employees are configured
pub fn default_roster() -> Roster {
    vec![
        Employee::new("EMP-143", "ABDUL RAHIM J"),
        Employee::new("EMP-017", "HAMZA SHAHZAD"),
        Employee::new("EMP-040", "MAHIN KHAN"),
    ]
}

/// Everything needed to produce one attendance sheet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub year: i32,
    pub month: u32,
    pub employees: Roster,
    /// Destination file; derived from the period when unset
    #[serde(alias = "outputPath", skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Worksheet name; derived from the period when unset
    #[serde(alias = "sheetTitle", skip_serializing_if = "Option::is_none")]
    pub sheet_title: Option<String>,
    #[serde(alias = "workingDays")]
    pub working_days: Vec<Weekday>,
    pub holidays: Vec<NaiveDate>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            year: 2025,
            month: 7,
            employees: default_roster(),
            output_path: None,
            sheet_title: None,
            working_days: MONDAY_TO_FRIDAY.to_vec(),
            holidays: Vec::new(),
        }
    }
}

impl SheetConfig {
    /// Default configuration for another month
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = read(path)?;
        toml::from_str(&source).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Commented sample config file
    pub fn sample_toml() -> &'static str {
        SAMPLE_TOML
    }

    /// Set the target month
    pub fn period(mut self, year: i32, month: u32) -> Self {
        self.year = year;
        self.month = month;
        self
    }

    /// Replace the roster
    pub fn employees(mut self, employees: Roster) -> Self {
        self.employees = employees;
        self
    }

    /// Set the destination file
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the worksheet name
    pub fn sheet_title(mut self, title: impl Into<String>) -> Self {
        self.sheet_title = Some(title.into());
        self
    }

    /// Replace the working weekdays
    pub fn working_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.working_days = days.into_iter().collect();
        self
    }

    /// Exclude a date
    pub fn holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.push(date);
        self
    }

    pub fn work_week(&self) -> WorkWeek {
        WorkWeek::from_days(self.working_days.iter().copied())
            .with_holidays(self.holidays.iter().copied())
    }

    /// Configured title, or `"<Month> <year> Attendance"`
    pub fn title_for(&self, period: Period) -> String {
        self.sheet_title
            .clone()
            .unwrap_or_else(|| format!("{} Attendance", period.label()))
    }

    /// Configured path, or `attendance_<month>_<year>.xlsx`
    pub fn output_path_for(&self, period: Period) -> PathBuf {
        self.output_path.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "attendance_{}_{}.xlsx",
                period.month_name().to_lowercase(),
                period.year()
            ))
        })
    }

    /// Check the configuration and return the target period.
    ///
    /// An empty roster is accepted with a warning; the sheet then holds
    /// only the header row.
    pub fn validate(&self) -> Result<Period, ConfigError> {
        let period = Period::new(self.year, self.month)?;

        if self.working_days.is_empty() {
            return Err(ConfigError::NoWorkingDays);
        }

        for (index, employee) in self.employees.iter().enumerate() {
            if employee.employee_id.trim().is_empty() {
                return Err(ConfigError::EmptyEmployeeId { index });
            }
        }

        validate_sheet_title(&self.title_for(period))?;

        if self.employees.is_empty() {
            warn!(
                period = %period.label(),
                "roster is empty, sheet will contain only the header row"
            );
        }

        let mut seen = HashSet::new();
        for employee in &self.employees {
            if !seen.insert(employee.employee_id.as_str()) {
                warn!(employee_id = %employee.employee_id, "duplicate employee id in roster");
            }
        }

        Ok(period)
    }
}

/// Worksheet naming rules shared by spreadsheet applications
pub fn validate_sheet_title(title: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidSheetTitle {
        title: title.to_string(),
        reason: reason.to_string(),
    };

    if title.trim().is_empty() {
        return Err(invalid("title is empty"));
    }
    if title.chars().count() > MAX_SHEET_TITLE_LEN {
        return Err(invalid("longer than 31 characters"));
    }
    if let Some(c) = title.chars().find(|c| FORBIDDEN_TITLE_CHARS.contains(c)) {
        return Err(invalid(&format!("contains forbidden character '{c}'")));
    }
    if title.starts_with('\'') || title.ends_with('\'') {
        return Err(invalid("starts or ends with an apostrophe"));
    }
    Ok(())
}

#[derive(Deserialize)]
struct RosterFile {
    employees: Roster,
}

/// Load a roster from a `.json` array of `{employeeId, name}` objects or a
/// `.toml` file with `[[employees]]` tables
pub fn load_roster(path: &Path) -> Result<Roster, ConfigError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match extension.as_deref() {
        Some("json") => {
            let source = read(path)?;
            serde_json::from_str(&source).map_err(|e| parse_error(e.to_string()))
        }
        Some("toml") => {
            let source = read(path)?;
            toml::from_str::<RosterFile>(&source)
                .map(|file| file.employees)
                .map_err(|e| parse_error(e.to_string()))
        }
        _ => Err(ConfigError::UnsupportedRosterFormat(path.to_path_buf())),
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
