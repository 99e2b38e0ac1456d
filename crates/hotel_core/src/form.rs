//! Raw input field validation.
//!
//! # Responsibility
//! - Convert raw strings from any input source into typed field values.
//! - Report failures as `FieldError` so callers can re-prompt.
//!
//! # Invariants
//! - Blank input is `MissingField` for required fields.
//! - Length limits count Unicode scalar values, after trimming.
//! - A blank or zero date component is `MissingField`.

use crate::calendar::{self, CalendarDate, DateError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    MissingField(&'static str),
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
    },
    NotANumber {
        field: &'static str,
        input: String,
    },
    InvalidChoice {
        field: &'static str,
        input: String,
        expected: &'static str,
    },
    Date {
        field: &'static str,
        source: DateError,
    },
}

impl FieldError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field)
            | Self::FieldTooLong { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotANumber { field, .. }
            | Self::InvalidChoice { field, .. }
            | Self::Date { field, .. } => *field,
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} cannot be left blank"),
            Self::FieldTooLong { field, max, actual } => write!(
                f,
                "{field} cannot be longer than {max} characters (got {actual})"
            ),
            Self::OutOfRange { field, value, min } => {
                write!(f, "{field} must be at least {min} (got {value})")
            }
            Self::NotANumber { field, input } => write!(f, "{field} `{input}` is not a number"),
            Self::InvalidChoice {
                field,
                input,
                expected,
            } => write!(f, "{field} `{input}` is invalid; expected {expected}"),
            Self::Date { field, source } => write!(f, "{field}: {source}"),
        }
    }
}

impl Error for FieldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Date { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parses a required integer field.
pub fn parse_integer(field: &'static str, input: &str) -> Result<i64, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FieldError::MissingField(field));
    }
    trimmed.parse::<i64>().map_err(|_| FieldError::NotANumber {
        field,
        input: trimmed.to_string(),
    })
}

/// Parses a required integer that must be `>= 1`.
pub fn parse_positive(field: &'static str, input: &str) -> Result<i64, FieldError> {
    let value = parse_integer(field, input)?;
    check_min(field, value, 1)?;
    Ok(value)
}

/// Checks `value >= min` for an already-typed integer field.
pub fn check_min(field: &'static str, value: i64, min: i64) -> Result<(), FieldError> {
    if value < min {
        return Err(FieldError::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
        });
    }
    Ok(())
}

/// Parses a required finite decimal that must be `>= min`.
pub fn parse_decimal(field: &'static str, input: &str, min: f64) -> Result<f64, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FieldError::MissingField(field));
    }
    let value = trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FieldError::NotANumber {
            field,
            input: trimmed.to_string(),
        })?;
    check_min_decimal(field, value, min)?;
    Ok(value)
}

/// Checks `value >= min` for a decimal field.
pub fn check_min_decimal(field: &'static str, value: f64, min: f64) -> Result<(), FieldError> {
    if value.is_nan() || value < min {
        return Err(FieldError::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
        });
    }
    Ok(())
}

/// Parses required text, enforcing a maximum length.
pub fn required_text(
    field: &'static str,
    input: &str,
    max_chars: usize,
) -> Result<String, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FieldError::MissingField(field));
    }
    check_length(field, trimmed, max_chars)?;
    Ok(trimmed.to_string())
}

/// Parses optional free text; blank input yields `None`.
pub fn optional_text(
    field: &'static str,
    input: &str,
    max_chars: Option<usize>,
) -> Result<Option<String>, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Some(max) = max_chars {
        check_length(field, trimmed, max)?;
    }
    Ok(Some(trimmed.to_string()))
}

/// Checks the character count of an already-typed text field.
pub fn check_length(field: &'static str, value: &str, max_chars: usize) -> Result<(), FieldError> {
    let actual = value.chars().count();
    if actual > max_chars {
        return Err(FieldError::FieldTooLong {
            field,
            max: max_chars,
            actual,
        });
    }
    Ok(())
}

/// Parses a y/n answer.
pub fn parse_yes_no(field: &'static str, input: &str) -> Result<bool, FieldError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        "" => Err(FieldError::MissingField(field)),
        other => Err(FieldError::InvalidChoice {
            field,
            input: other.to_string(),
            expected: "y or n",
        }),
    }
}

/// Parses one of a closed set of values via `FromStr`.
pub fn parse_choice<T: FromStr>(
    field: &'static str,
    input: &str,
    expected: &'static str,
) -> Result<T, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FieldError::MissingField(field));
    }
    trimmed.parse::<T>().map_err(|_| FieldError::InvalidChoice {
        field,
        input: trimmed.to_string(),
        expected,
    })
}

/// Parses a date given as three separately entered components.
///
/// Blank components count as zero and are therefore `MissingField`.
pub fn parse_date_parts(
    field: &'static str,
    year: &str,
    month: &str,
    day: &str,
) -> Result<CalendarDate, FieldError> {
    let component = |input: &str| -> Result<i64, FieldError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed.parse::<i64>().map_err(|_| FieldError::NotANumber {
            field,
            input: trimmed.to_string(),
        })
    };

    calendar::validate(component(year)?, component(month)?, component(day)?)
        .map_err(|source| FieldError::Date { field, source })
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(field: &'static str, input: &str) -> Result<CalendarDate, FieldError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FieldError::MissingField(field));
    }
    trimmed
        .parse::<CalendarDate>()
        .map_err(|source| FieldError::Date { field, source })
}
