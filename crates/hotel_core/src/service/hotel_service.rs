//! Hotel desk use-case service.
//!
//! # Responsibility
//! - Provide one entry point per menu action.
//! - Enforce cross-row rules the schema cannot express (one booking per
//!   customer/room, staff roles, repair location).
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Log events carry ids and counts only, never user-entered text.

use crate::calendar::CalendarDate;
use crate::executor::{RowSet, StatementExecutor};
use crate::form::FieldError;
use crate::model::hotel::{
    Assignment, Booking, Customer, MaintenanceCompany, Repair, RepairRequest, Room,
};
use crate::repo::hotel_repo::HotelRepository;
use crate::repo::report_repo::{DateRange, HotelReports};
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// `Staff.role` value allowed to receive cleaning assignments.
pub const HOUSE_CLEANING_ROLE: &str = "HouseCleaning";
/// `Staff.role` value allowed to raise repair requests.
pub const MANAGER_ROLE: &str = "Manager";

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    Field(FieldError),
    Repo(RepoError),
    /// Customer already holds this booking id for the room.
    BookingExists(i64),
    StaffNotFound(i64),
    StaffRoleMismatch {
        ssn: i64,
        expected: &'static str,
        actual: String,
    },
    RepairNotFound(i64),
    /// Repair exists but was made in a different room.
    RepairLocationMismatch {
        repair_id: i64,
        hotel_id: i64,
        room_no: i64,
    },
    /// Range end precedes range start.
    InvalidDateRange {
        start: CalendarDate,
        end: CalendarDate,
    },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::BookingExists(booking_id) => {
                write!(f, "booking {booking_id} already exists for this customer and room")
            }
            Self::StaffNotFound(ssn) => write!(f, "staff member {ssn} not found"),
            Self::StaffRoleMismatch {
                ssn,
                expected,
                actual,
            } => write!(f, "staff member {ssn} has role `{actual}`, expected `{expected}`"),
            Self::RepairNotFound(repair_id) => write!(f, "repair {repair_id} not found"),
            Self::RepairLocationMismatch {
                repair_id,
                hotel_id,
                room_no,
            } => write!(
                f,
                "repair {repair_id} was not made in room {room_no} of hotel {hotel_id}"
            ),
            Self::InvalidDateRange { start, end } => {
                write!(f, "date range end {end} is before start {start}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Field(err),
            other => Self::Repo(other),
        }
    }
}

impl From<FieldError> for ServiceError {
    fn from(value: FieldError) -> Self {
        Self::Field(value)
    }
}

/// Input for a cleaning-staff assignment; the id is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignStaffRequest {
    pub staff_id: i64,
    pub hotel_id: i64,
    pub room_no: i64,
}

/// Input for a repair request; the id is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairRequestInput {
    pub hotel_id: i64,
    pub room_no: i64,
    pub manager_id: i64,
    pub repair_id: i64,
    pub request_date: CalendarDate,
    pub description: Option<String>,
}

/// Use-case facade over the hotel repository and reports.
pub struct HotelService<R: HotelRepository, E: StatementExecutor> {
    repo: R,
    reports: HotelReports<E>,
}

impl<R: HotelRepository, E: StatementExecutor> HotelService<R, E> {
    pub fn new(repo: R, reports: HotelReports<E>) -> Self {
        Self { repo, reports }
    }

    pub fn add_customer(&self, customer: &Customer) -> ServiceResult<()> {
        logged("customer_create", customer.customer_id, || {
            self.repo.insert_customer(customer)
        })
    }

    pub fn add_room(&self, room: &Room) -> ServiceResult<()> {
        logged("room_create", room.room_no, || self.repo.insert_room(room))
    }

    pub fn add_maintenance_company(&self, company: &MaintenanceCompany) -> ServiceResult<()> {
        logged("company_create", company.company_id, || {
            self.repo.insert_company(company)
        })
    }

    pub fn add_repair(&self, repair: &Repair) -> ServiceResult<()> {
        logged("repair_create", repair.repair_id, || {
            self.repo.insert_repair(repair)
        })
    }

    /// Looks up an existing booking before offering to create one.
    pub fn find_booking(
        &self,
        customer_id: i64,
        hotel_id: i64,
        room_no: i64,
    ) -> ServiceResult<Option<i64>> {
        Ok(self.repo.find_booking(customer_id, hotel_id, room_no)?)
    }

    /// Creates a booking unless the customer already booked this room.
    pub fn book_room(&self, booking: &Booking) -> ServiceResult<()> {
        if let Some(existing) =
            self.find_booking(booking.customer_id, booking.hotel_id, booking.room_no)?
        {
            warn!(
                "event=booking_create module=service status=rejected booking_id={} existing_id={}",
                booking.booking_id, existing
            );
            return Err(ServiceError::BookingExists(existing));
        }
        logged("booking_create", booking.booking_id, || {
            self.repo.insert_booking(booking)
        })
    }

    /// Assigns house-cleaning staff to a room with a generated id.
    pub fn assign_house_cleaning(&self, request: AssignStaffRequest) -> ServiceResult<Assignment> {
        self.require_role(request.staff_id, HOUSE_CLEANING_ROLE)?;
        let assignment = Assignment {
            assignment_id: self.repo.next_assignment_id()?,
            staff_id: request.staff_id,
            hotel_id: request.hotel_id,
            room_no: request.room_no,
        };
        logged("assignment_create", assignment.assignment_id, || {
            self.repo.insert_assignment(&assignment)
        })?;
        Ok(assignment)
    }

    /// Raises a manager request for a repair made in the given room.
    pub fn raise_repair_request(&self, input: RepairRequestInput) -> ServiceResult<RepairRequest> {
        self.require_role(input.manager_id, MANAGER_ROLE)?;

        let location = self
            .repo
            .repair_location(input.repair_id)?
            .ok_or(ServiceError::RepairNotFound(input.repair_id))?;
        if location.hotel_id != input.hotel_id || location.room_no != input.room_no {
            return Err(ServiceError::RepairLocationMismatch {
                repair_id: input.repair_id,
                hotel_id: input.hotel_id,
                room_no: input.room_no,
            });
        }

        let request = RepairRequest {
            request_id: self.repo.next_request_id()?,
            manager_id: input.manager_id,
            repair_id: input.repair_id,
            request_date: input.request_date,
            description: input.description,
        };
        logged("repair_request_create", request.request_id, || {
            self.repo.insert_repair_request(&request)
        })?;
        Ok(request)
    }

    pub fn available_rooms(&self, hotel_id: i64) -> ServiceResult<RowSet> {
        Ok(self.reports.available_rooms(hotel_id)?)
    }

    pub fn booked_rooms(&self, hotel_id: i64) -> ServiceResult<RowSet> {
        Ok(self.reports.booked_rooms(hotel_id)?)
    }

    pub fn bookings_for_week(&self, hotel_id: i64, start: CalendarDate) -> ServiceResult<RowSet> {
        Ok(self.reports.bookings_for_week(hotel_id, start)?)
    }

    pub fn top_room_prices(&self, range: DateRange, k: i64) -> ServiceResult<RowSet> {
        check_range(range)?;
        Ok(self.reports.top_room_prices(range, k)?)
    }

    pub fn top_customer_bookings(&self, customer_id: i64, k: i64) -> ServiceResult<RowSet> {
        Ok(self.reports.top_customer_bookings(customer_id, k)?)
    }

    pub fn total_cost(
        &self,
        customer_id: i64,
        hotel_id: i64,
        range: DateRange,
    ) -> ServiceResult<RowSet> {
        check_range(range)?;
        Ok(self.reports.total_cost(customer_id, hotel_id, range)?)
    }

    pub fn repairs_by_company(&self, company_id: i64) -> ServiceResult<RowSet> {
        Ok(self.reports.repairs_by_company(company_id)?)
    }

    pub fn top_maintenance_companies(&self, k: i64) -> ServiceResult<RowSet> {
        Ok(self.reports.top_companies(k)?)
    }

    pub fn repairs_per_year(&self, hotel_id: i64, room_no: i64) -> ServiceResult<RowSet> {
        Ok(self.reports.repairs_per_year(hotel_id, room_no)?)
    }

    fn require_role(&self, ssn: i64, expected: &'static str) -> ServiceResult<()> {
        let role = self
            .repo
            .staff_role(ssn)?
            .ok_or(ServiceError::StaffNotFound(ssn))?;
        if role != expected {
            return Err(ServiceError::StaffRoleMismatch {
                ssn,
                expected,
                actual: role,
            });
        }
        Ok(())
    }
}

fn check_range(range: DateRange) -> ServiceResult<()> {
    if range.end < range.start {
        return Err(ServiceError::InvalidDateRange {
            start: range.start,
            end: range.end,
        });
    }
    Ok(())
}

fn logged(
    event: &'static str,
    id: i64,
    write: impl FnOnce() -> Result<(), RepoError>,
) -> ServiceResult<()> {
    let started_at = Instant::now();
    let result = write();
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(()) => {
            info!("event={event} module=service status=ok id={id} duration_ms={duration_ms}");
            Ok(())
        }
        Err(err) => {
            warn!(
                "event={event} module=service status=error id={id} duration_ms={duration_ms} error_kind={}",
                error_kind(&err)
            );
            Err(err.into())
        }
    }
}

fn error_kind(err: &RepoError) -> &'static str {
    match err {
        RepoError::Validation(_) => "validation",
        RepoError::Build(_) => "build",
        RepoError::Exec(_) => "execution",
        RepoError::InvalidData(_) => "invalid_data",
    }
}
