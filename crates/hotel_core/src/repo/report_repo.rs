//! Read-only hotel reports.
//!
//! # Responsibility
//! - Answer the menu's counting, ranking and listing questions.
//!
//! # Invariants
//! - Reports needing joins or aggregates use fixed SQL constants whose `?N`
//!   markers are bound in order, each marker used once.
//! - Single-table reports go through `statement::build`.
//! - Row limits are checked before any statement runs.
//! - Date ranges compare ISO text, which sorts chronologically.

use super::RepoResult;
use crate::calendar::CalendarDate;
use crate::executor::{RowSet, SqliteExecutor, StatementExecutor};
use crate::form::FieldError;
use crate::statement::{
    build, check_limit, BoundStatement, SortDirection, SqlValue, StatementSpec,
};
use rusqlite::Connection;

/// Length of the window used by the weekly bookings report.
pub const WEEK_DAYS: i64 = 7;

const AVAILABLE_ROOMS_SQL: &str = "SELECT COUNT(*) AS available_rooms
FROM Room R
WHERE R.hotelID = ?1
  AND NOT EXISTS (
      SELECT 1 FROM Booking B
      WHERE B.hotelID = R.hotelID AND B.roomNo = R.roomNo
  );";

const BOOKED_ROOMS_SQL: &str = "SELECT COUNT(DISTINCT B.roomNo) AS booked_rooms
FROM Booking B
WHERE B.hotelID = ?1;";

const WEEK_BOOKINGS_SQL: &str = "SELECT B.roomNo, B.bID, B.bookingDate, B.customer
FROM Booking B
WHERE B.hotelID = ?1
  AND B.bookingDate >= ?2
  AND B.bookingDate < ?3
ORDER BY B.bookingDate ASC, B.roomNo ASC;";

const TOP_ROOM_PRICES_SQL: &str = "SELECT B.hotelID, B.roomNo, MAX(B.price) AS price
FROM Booking B
WHERE B.bookingDate >= ?1
  AND B.bookingDate <= ?2
GROUP BY B.hotelID, B.roomNo
ORDER BY price DESC, B.hotelID ASC, B.roomNo ASC
LIMIT ?3;";

const TOTAL_COST_SQL: &str = "SELECT COALESCE(SUM(B.price), 0.0) AS total_cost
FROM Booking B
WHERE B.customer = ?1
  AND B.hotelID = ?2
  AND B.bookingDate >= ?3
  AND B.bookingDate <= ?4;";

const REPAIRS_BY_COMPANY_SQL: &str = "SELECT M.name, R.rID, R.repairType, R.hotelID, R.roomNo
FROM Repair R
JOIN MaintenanceCompany M ON M.cmpID = R.mCompany
WHERE M.cmpID = ?1
ORDER BY R.rID ASC;";

const TOP_COMPANIES_SQL: &str = "SELECT M.name, COUNT(R.rID) AS repair_count
FROM MaintenanceCompany M
JOIN Repair R ON R.mCompany = M.cmpID
GROUP BY M.cmpID, M.name
ORDER BY repair_count DESC, M.name ASC
LIMIT ?1;";

const REPAIRS_PER_YEAR_SQL: &str = "SELECT substr(R.repairDate, 1, 4) AS repair_year, COUNT(*) AS repair_count
FROM Repair R
WHERE R.hotelID = ?1
  AND R.roomNo = ?2
GROUP BY repair_year
ORDER BY repair_year ASC;";

/// Inclusive date range used by range reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

/// Report queries behind the read-only menu actions.
pub struct HotelReports<E: StatementExecutor> {
    executor: E,
}

impl<'conn> HotelReports<SqliteExecutor<'conn>> {
    pub fn from_connection(conn: &'conn Connection) -> Self {
        Self::new(SqliteExecutor::new(conn))
    }
}

impl<E: StatementExecutor> HotelReports<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Rooms of the hotel that have never been booked.
    pub fn available_rooms(&self, hotel_id: i64) -> RepoResult<RowSet> {
        self.run(AVAILABLE_ROOMS_SQL, vec![hotel_id.into()])
    }

    /// Distinct rooms of the hotel with at least one booking.
    pub fn booked_rooms(&self, hotel_id: i64) -> RepoResult<RowSet> {
        self.run(BOOKED_ROOMS_SQL, vec![hotel_id.into()])
    }

    /// Bookings dated in `[start, start + 7 days)`.
    pub fn bookings_for_week(&self, hotel_id: i64, start: CalendarDate) -> RepoResult<RowSet> {
        let end = start
            .add_days(WEEK_DAYS)
            .map_err(|source| FieldError::Date {
                field: "week end date",
                source,
            })?;
        self.run(
            WEEK_BOOKINGS_SQL,
            vec![hotel_id.into(), start.into(), end.into()],
        )
    }

    /// Rooms ranked by their highest booking price within `range`.
    pub fn top_room_prices(&self, range: DateRange, k: i64) -> RepoResult<RowSet> {
        let k = check_limit(k)?;
        self.run(
            TOP_ROOM_PRICES_SQL,
            vec![range.start.into(), range.end.into(), k.into()],
        )
    }

    /// The customer's `k` most expensive bookings.
    pub fn top_customer_bookings(&self, customer_id: i64, k: i64) -> RepoResult<RowSet> {
        let statement = build(
            &StatementSpec::select("Booking")
                .project("bID")
                .project("hotelID")
                .project("roomNo")
                .project("bookingDate")
                .project("price")
                .column("customer", customer_id)
                .order_by("price", SortDirection::Desc)
                .limit(k),
        )?;
        Ok(self.executor.query(&statement)?)
    }

    /// Sum of the customer's booking prices at one hotel within `range`.
    pub fn total_cost(&self, customer_id: i64, hotel_id: i64, range: DateRange) -> RepoResult<RowSet> {
        self.run(
            TOTAL_COST_SQL,
            vec![
                customer_id.into(),
                hotel_id.into(),
                range.start.into(),
                range.end.into(),
            ],
        )
    }

    /// Repairs made by one maintenance company.
    pub fn repairs_by_company(&self, company_id: i64) -> RepoResult<RowSet> {
        self.run(REPAIRS_BY_COMPANY_SQL, vec![company_id.into()])
    }

    /// Companies ranked by number of repairs.
    pub fn top_companies(&self, k: i64) -> RepoResult<RowSet> {
        let k = check_limit(k)?;
        self.run(TOP_COMPANIES_SQL, vec![k.into()])
    }

    /// Repair count per calendar year for one room.
    pub fn repairs_per_year(&self, hotel_id: i64, room_no: i64) -> RepoResult<RowSet> {
        self.run(REPAIRS_PER_YEAR_SQL, vec![hotel_id.into(), room_no.into()])
    }

    fn run(&self, sql: &'static str, params: Vec<SqlValue>) -> RepoResult<RowSet> {
        let statement = BoundStatement::from_parts(sql, params);
        debug_assert_eq!(statement.placeholder_count(), statement.params().len());
        Ok(self.executor.query(&statement)?)
    }
}
