//! Gregorian calendar date validation.
//!
//! # Responsibility
//! - Turn raw year/month/day components into a validated `CalendarDate`.
//! - Own leap-year and month-length arithmetic for every date field.
//!
//! # Invariants
//! - A zero component is always `MissingField`, never `OutOfRange`.
//! - `CalendarDate` values are valid by construction (year 1..=9999).
//! - All functions are pure and deterministic.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const MIN_YEAR: i64 = 1;
pub const MAX_YEAR: i64 = 9999;
pub const MAX_MONTH: i64 = 12;

const FEBRUARY: u8 = 2;
const FEBRUARY_DAYS_LEAP: u8 = 29;
/// Index 0 is unused; February holds the non-leap length.
const DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days between 0000-03-01 and 1970-01-01 in the proleptic Gregorian calendar.
const EPOCH_SHIFT_DAYS: i64 = 719_468;
const DAYS_PER_ERA: i64 = 146_097;

/// Which part of a date a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateComponent {
    Year,
    Month,
    Day,
}

impl DateComponent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
        }
    }
}

impl Display for DateComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Component was zero, which callers use to mean "left blank".
    MissingField(DateComponent),
    /// Component is outside its valid range.
    OutOfRange {
        component: DateComponent,
        value: i64,
        min: i64,
        max: i64,
    },
    /// Text form is not `YYYY-MM-DD`.
    Malformed(String),
}

impl Display for DateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(component) => write!(f, "date {component} cannot be left blank"),
            Self::OutOfRange {
                component,
                value,
                min,
                max,
            } => write!(
                f,
                "date {component} {value} is out of range ({min} - {max})"
            ),
            Self::Malformed(value) => write!(f, "date `{value}` is not in YYYY-MM-DD format"),
        }
    }
}

impl Error for DateError {}

/// A valid Gregorian calendar date.
///
/// Ordering is chronological. Text and serde form is ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate {
    year: u16,
    month: u8,
    day: u8,
}

/// Validates year/month/day components and builds a `CalendarDate`.
///
/// # Errors
/// - `MissingField` when any component is zero (year checked first).
/// - `OutOfRange` when year is outside 1..=9999, month outside 1..=12, or day
///   beyond the length of the month.
pub fn validate(year: i64, month: i64, day: i64) -> Result<CalendarDate, DateError> {
    for (component, value) in [
        (DateComponent::Year, year),
        (DateComponent::Month, month),
        (DateComponent::Day, day),
    ] {
        if value == 0 {
            return Err(DateError::MissingField(component));
        }
    }

    check_range(DateComponent::Year, year, MIN_YEAR, MAX_YEAR)?;
    check_range(DateComponent::Month, month, 1, MAX_MONTH)?;

    // Both fit after the range checks above.
    let year = year as u16;
    let month = month as u8;
    check_range(
        DateComponent::Day,
        day,
        1,
        i64::from(days_in_month(year, month)),
    )?;

    Ok(CalendarDate {
        year,
        month,
        day: day as u8,
    })
}

/// Gregorian leap-year rule.
pub const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` of `year`. `month` must be 1..=12.
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

fn check_range(component: DateComponent, value: i64, min: i64, max: i64) -> Result<(), DateError> {
    if value < min || value > max {
        return Err(DateError::OutOfRange {
            component,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl CalendarDate {
    pub fn year(self) -> u16 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the date `days` days later (or earlier for negative values).
    ///
    /// # Errors
    /// Returns `OutOfRange` on the year component when the result leaves
    /// 1..=9999.
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let (year, month, day) = civil_from_days(self.day_number().saturating_add(days));
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::OutOfRange {
                component: DateComponent::Year,
                value: year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            });
        }
        validate(year, month, day)
    }

    /// Days since 1970-01-01.
    fn day_number(self) -> i64 {
        let month = i64::from(self.month);
        let year = i64::from(self.year) - i64::from(month <= 2);
        let era = year.div_euclid(400);
        let year_of_era = year - era * 400;
        let shifted_month = if month > 2 { month - 3 } else { month + 9 };
        let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(self.day) - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        era * DAYS_PER_ERA + day_of_era - EPOCH_SHIFT_DAYS
    }
}

/// Saturated inputs map to years far outside 1..=9999.
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let shifted = days.saturating_add(EPOCH_SHIFT_DAYS);
    let era = shifted.div_euclid(DAYS_PER_ERA);
    let day_of_era = shifted - era * DAYS_PER_ERA;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = year_of_era + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(DateError::Malformed(trimmed.to_string()));
        };

        let parse = |part: &str| {
            if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(DateError::Malformed(trimmed.to_string()));
            }
            part.parse::<i64>()
                .map_err(|_| DateError::Malformed(trimmed.to_string()))
        };

        validate(parse(year)?, parse(month)?, parse(day)?)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.to_string()
    }
}
