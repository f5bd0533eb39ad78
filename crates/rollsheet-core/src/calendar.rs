//! Calendar periods and the working-day filter
//!
//! A [`Period`] is one calendar month. A [`WorkWeek`] decides which of its
//! dates get a column in the sheet: the weekday must be a working day and
//! the date must not be a listed holiday.
//!
//! ```rust
//! use chrono::Weekday;
//! use rollsheet_core::{qualifying_dates, Period, WorkWeek};
//!
//! let july = Period::new(2025, 7).unwrap();
//! assert_eq!(qualifying_dates(july, &WorkWeek::default()).unwrap().len(), 23);
//!
//! // Six-day week: Saturdays count too
//! let six_day = WorkWeek::from_days([
//!     Weekday::Mon, Weekday::Tue, Weekday::Wed,
//!     Weekday::Thu, Weekday::Fri, Weekday::Sat,
//! ]);
//! assert_eq!(qualifying_dates(july, &six_day).unwrap().len(), 27);
//! ```

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Monday through Friday
pub const MONDAY_TO_FRIDAY: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Highest year that still formats as a four-digit ISO year
pub const MAX_YEAR: i32 = 9999;

// ============================================================================
// Period
// ============================================================================

/// A single calendar month
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    first: NaiveDate,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, ConfigError> {
        if !(1..=12).contains(&month) {
            return Err(ConfigError::InvalidMonth(month));
        }
        if !(1..=MAX_YEAR).contains(&year) {
            return Err(ConfigError::YearOutOfRange(year));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(ConfigError::YearOutOfRange(year))
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Last calendar day of the month (28-31)
    pub fn last_day(&self) -> NaiveDate {
        self.days().last().unwrap_or(self.first)
    }

    /// Every date of the month, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.month();
        self.first.iter_days().take_while(move |d| d.month() == month)
    }

    /// English month name, e.g. "July"
    pub fn month_name(&self) -> String {
        self.first.format("%B").to_string()
    }

    /// Month and year, e.g. "July 2025"
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year())
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

// ============================================================================
// WorkWeek
// ============================================================================

/// Working-day filter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWeek {
    /// Weekdays that get a column
    pub working_days: Vec<Weekday>,
    /// Dates excluded even when they fall on a working day
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

impl Default for WorkWeek {
    fn default() -> Self {
        Self {
            working_days: MONDAY_TO_FRIDAY.to_vec(),
            holidays: Vec::new(),
        }
    }
}

impl WorkWeek {
    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            working_days: days.into_iter().collect(),
            holidays: Vec::new(),
        }
    }

    /// Exclude specific dates
    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(holidays);
        self
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        if !self.working_days.contains(&date.weekday()) {
            return false;
        }
        !self.holidays.contains(&date)
    }
}

// ============================================================================
// Qualifying dates
// ============================================================================

/// Dates of `period` that pass the working-day filter, in calendar order.
///
/// Fails with [`ConfigError::NoQualifyingDates`] when the filter removes
/// every date of the month.
pub fn qualifying_dates(
    period: Period,
    work_week: &WorkWeek,
) -> Result<Vec<NaiveDate>, ConfigError> {
    let dates: Vec<NaiveDate> = period
        .days()
        .filter(|date| work_week.is_working_day(*date))
        .collect();

    if dates.is_empty() {
        return Err(ConfigError::NoQualifyingDates {
            period: period.label(),
        });
    }
    Ok(dates)
}

/// ISO `YYYY-MM-DD` labels
pub fn date_labels(dates: &[NaiveDate]) -> Vec<String> {
    dates
        .iter()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect()
}
