//! Core of the hotel front desk: date validation, the parameterized
//! statement builder, and the SQLite-backed repositories and services
//! behind every menu action.

pub mod calendar;
pub mod db;
pub mod executor;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod statement;

pub use calendar::{CalendarDate, DateComponent, DateError};
pub use db::{load_script, open_db, open_db_in_memory, DbError, DbResult};
pub use executor::{ExecError, RowSet, SqliteExecutor, StatementExecutor};
pub use form::FieldError;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::hotel::{
    Assignment, Booking, Customer, Gender, MaintenanceCompany, Repair, RepairRequest, Room,
};
pub use repo::hotel_repo::{HotelRepository, SqlHotelRepository};
pub use repo::report_repo::{DateRange, HotelReports};
pub use repo::{RepoError, RepoResult};
pub use service::hotel_service::{
    AssignStaffRequest, HotelService, RepairRequestInput, ServiceError, ServiceResult,
};
pub use statement::{build, BoundStatement, BuildError, SqlValue, StatementSpec};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
