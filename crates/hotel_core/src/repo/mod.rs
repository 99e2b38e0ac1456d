//! Repository layer over the statement builder and executor.
//!
//! # Responsibility
//! - Map hotel records onto tables and columns.
//! - Keep every statement parameter-bound: writes and lookups go through
//!   `statement::build`, reports use fixed SQL with `?N` markers.
//!
//! # Invariants
//! - Write paths call the record's `validate()` before building a statement.
//! - Execution errors are returned unchanged (no retry).

pub mod hotel_repo;
pub mod report_repo;

use crate::executor::ExecError;
use crate::form::FieldError;
use crate::statement::BuildError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Clone, PartialEq)]
pub enum RepoError {
    Validation(FieldError),
    Build(BuildError),
    Exec(ExecError),
    /// A stored value could not be decoded.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Build(err) => write!(f, "{err}"),
            Self::Exec(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Build(err) => Some(err),
            Self::Exec(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<FieldError> for RepoError {
    fn from(value: FieldError) -> Self {
        Self::Validation(value)
    }
}

impl From<BuildError> for RepoError {
    fn from(value: BuildError) -> Self {
        Self::Build(value)
    }
}

impl From<ExecError> for RepoError {
    fn from(value: ExecError) -> Self {
        Self::Exec(value)
    }
}

/// Parses an integer cell returned by the executor.
fn parse_int_cell(table_column: &str, value: Option<&str>) -> RepoResult<i64> {
    let text = value.ok_or_else(|| RepoError::InvalidData(format!("missing {table_column}")))?;
    text.parse::<i64>().map_err(|_| {
        RepoError::InvalidData(format!("invalid integer `{text}` in {table_column}"))
    })
}
