//! Hotel write repository and point lookups.
//!
//! # Responsibility
//! - Insert customers, rooms, companies, repairs, bookings, assignments and
//!   repair requests.
//! - Answer the lookups menu actions need before writing (existing booking,
//!   staff role, repair location, next generated id).
//!
//! # Invariants
//! - Inserts are built by `statement::build`; no value enters SQL text.
//! - Column order in every insert matches the table definition.

use super::{parse_int_cell, RepoResult};
use crate::executor::{SqliteExecutor, StatementExecutor};
use crate::model::hotel::{
    Assignment, Booking, Customer, MaintenanceCompany, Repair, RepairRequest, Room,
};
use crate::statement::{build, BoundStatement, SqlValue, StatementSpec};
use rusqlite::Connection;

/// Generated assignment ids start after this value.
pub const ASSIGNMENT_ID_BASE: i64 = 2000;
/// Generated repair request ids start after this value.
pub const REQUEST_ID_BASE: i64 = 1999;

const NEXT_ASSIGNMENT_ID_SQL: &str =
    "SELECT COALESCE(MAX(asgID), ?1) + 1 AS next_id FROM Assigned;";
const NEXT_REQUEST_ID_SQL: &str = "SELECT COALESCE(MAX(reqID), ?1) + 1 AS next_id FROM Request;";

/// Where a repair took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairLocation {
    pub hotel_id: i64,
    pub room_no: i64,
}

/// Repository interface for hotel writes and lookups.
pub trait HotelRepository {
    fn insert_customer(&self, customer: &Customer) -> RepoResult<()>;
    fn insert_room(&self, room: &Room) -> RepoResult<()>;
    fn insert_company(&self, company: &MaintenanceCompany) -> RepoResult<()>;
    fn insert_repair(&self, repair: &Repair) -> RepoResult<()>;
    fn insert_booking(&self, booking: &Booking) -> RepoResult<()>;
    fn insert_assignment(&self, assignment: &Assignment) -> RepoResult<()>;
    fn insert_repair_request(&self, request: &RepairRequest) -> RepoResult<()>;
    /// Returns the booking id for this customer/hotel/room, if any.
    fn find_booking(&self, customer_id: i64, hotel_id: i64, room_no: i64)
        -> RepoResult<Option<i64>>;
    /// Returns the role of a staff member, if the SSN exists.
    fn staff_role(&self, ssn: i64) -> RepoResult<Option<String>>;
    fn repair_location(&self, repair_id: i64) -> RepoResult<Option<RepairLocation>>;
    fn next_assignment_id(&self) -> RepoResult<i64>;
    fn next_request_id(&self) -> RepoResult<i64>;
}

/// Repository running builder output through any executor.
pub struct SqlHotelRepository<E: StatementExecutor> {
    executor: E,
}

impl<E: StatementExecutor> SqlHotelRepository<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    fn insert(&self, spec: StatementSpec) -> RepoResult<()> {
        let statement = build(&spec)?;
        self.executor.execute(&statement)?;
        Ok(())
    }

    fn next_id(&self, sql: &'static str, base: i64) -> RepoResult<i64> {
        let rows = self
            .executor
            .query(&BoundStatement::from_parts(sql, vec![SqlValue::Integer(base)]))?;
        parse_int_cell("next_id", rows.cell(0, "next_id"))
    }
}

impl<'conn> SqlHotelRepository<SqliteExecutor<'conn>> {
    /// Builds a repository over a migrated SQLite connection.
    pub fn from_connection(conn: &'conn Connection) -> Self {
        Self::new(SqliteExecutor::new(conn))
    }
}

impl<E: StatementExecutor> HotelRepository for SqlHotelRepository<E> {
    fn insert_customer(&self, customer: &Customer) -> RepoResult<()> {
        customer.validate()?;
        self.insert(
            StatementSpec::insert("Customer")
                .column("customerID", customer.customer_id)
                .column("fName", customer.first_name.as_str())
                .column("lName", customer.last_name.as_str())
                .column("Address", customer.address.as_str())
                .column("phNo", customer.phone)
                .column("DOB", customer.date_of_birth)
                .column("gender", customer.gender.as_str()),
        )
    }

    fn insert_room(&self, room: &Room) -> RepoResult<()> {
        room.validate()?;
        self.insert(
            StatementSpec::insert("Room")
                .column("hotelID", room.hotel_id)
                .column("roomNo", room.room_no)
                .column("roomType", room.room_type.as_str()),
        )
    }

    fn insert_company(&self, company: &MaintenanceCompany) -> RepoResult<()> {
        company.validate()?;
        let mut spec = StatementSpec::insert("MaintenanceCompany")
            .column("cmpID", company.company_id)
            .column("name", company.name.as_str());
        if let Some(address) = &company.address {
            spec = spec.column("address", address.as_str());
        }
        self.insert(spec.column("isCertified", company.is_certified))
    }

    fn insert_repair(&self, repair: &Repair) -> RepoResult<()> {
        repair.validate()?;
        let mut spec = StatementSpec::insert("Repair")
            .column("rID", repair.repair_id)
            .column("hotelID", repair.hotel_id)
            .column("roomNo", repair.room_no)
            .column("mCompany", repair.company_id)
            .column("repairDate", repair.repair_date);
        if let Some(description) = &repair.description {
            spec = spec.column("description", description.as_str());
        }
        self.insert(spec.column("repairType", repair.repair_type.as_str()))
    }

    fn insert_booking(&self, booking: &Booking) -> RepoResult<()> {
        booking.validate()?;
        self.insert(
            StatementSpec::insert("Booking")
                .column("bID", booking.booking_id)
                .column("customer", booking.customer_id)
                .column("hotelID", booking.hotel_id)
                .column("roomNo", booking.room_no)
                .column("bookingDate", booking.booking_date)
                .column("noOfPeople", booking.people)
                .column("price", booking.price),
        )
    }

    fn insert_assignment(&self, assignment: &Assignment) -> RepoResult<()> {
        self.insert(
            StatementSpec::insert("Assigned")
                .column("asgID", assignment.assignment_id)
                .column("staffID", assignment.staff_id)
                .column("hotelID", assignment.hotel_id)
                .column("roomNo", assignment.room_no),
        )
    }

    fn insert_repair_request(&self, request: &RepairRequest) -> RepoResult<()> {
        let mut spec = StatementSpec::insert("Request")
            .column("reqID", request.request_id)
            .column("managerID", request.manager_id)
            .column("repairID", request.repair_id)
            .column("requestDate", request.request_date);
        if let Some(description) = &request.description {
            spec = spec.column("description", description.as_str());
        }
        self.insert(spec)
    }

    fn find_booking(
        &self,
        customer_id: i64,
        hotel_id: i64,
        room_no: i64,
    ) -> RepoResult<Option<i64>> {
        let statement = build(
            &StatementSpec::select("Booking")
                .project("bID")
                .column("customer", customer_id)
                .column("hotelID", hotel_id)
                .column("roomNo", room_no)
                .limit(1),
        )?;
        let rows = self.executor.query(&statement)?;
        if rows.is_empty() {
            return Ok(None);
        }
        parse_int_cell("Booking.bID", rows.cell(0, "bID")).map(Some)
    }

    fn staff_role(&self, ssn: i64) -> RepoResult<Option<String>> {
        let statement = build(
            &StatementSpec::select("Staff")
                .project("role")
                .column("SSN", ssn),
        )?;
        let rows = self.executor.query(&statement)?;
        Ok(rows.cell(0, "role").map(str::to_string))
    }

    fn repair_location(&self, repair_id: i64) -> RepoResult<Option<RepairLocation>> {
        let statement = build(
            &StatementSpec::select("Repair")
                .project("hotelID")
                .project("roomNo")
                .column("rID", repair_id),
        )?;
        let rows = self.executor.query(&statement)?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(RepairLocation {
            hotel_id: parse_int_cell("Repair.hotelID", rows.cell(0, "hotelID"))?,
            room_no: parse_int_cell("Repair.roomNo", rows.cell(0, "roomNo"))?,
        }))
    }

    fn next_assignment_id(&self) -> RepoResult<i64> {
        self.next_id(NEXT_ASSIGNMENT_ID_SQL, ASSIGNMENT_ID_BASE)
    }

    fn next_request_id(&self) -> RepoResult<i64> {
        self.next_id(NEXT_REQUEST_ID_SQL, REQUEST_ID_BASE)
    }
}
