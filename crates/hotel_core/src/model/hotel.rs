//! Hotel domain records.
//!
//! # Responsibility
//! - Define the rows written by the menu actions.
//! - Enforce column constraints before anything reaches the builder.
//!
//! # Invariants
//! - `validate()` is called by repositories on every write path.
//! - Dates are `CalendarDate`, so they are valid by construction.

use crate::calendar::CalendarDate;
use crate::form::{self, FieldError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const PERSON_NAME_MAX_CHARS: usize = 30;
pub const COMPANY_NAME_MAX_CHARS: usize = 30;
pub const ROOM_TYPE_MAX_CHARS: usize = 10;
pub const REPAIR_TYPE_MAX_CHARS: usize = 30;

/// Customer gender as stored in `Customer.gender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const CHOICES: &'static str = "'Male', 'Female', or 'Other'";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: i64,
    pub date_of_birth: CalendarDate,
    pub gender: Gender,
}

impl Customer {
    pub fn validate(&self) -> Result<(), FieldError> {
        check_required("first name", &self.first_name, PERSON_NAME_MAX_CHARS)?;
        check_required("last name", &self.last_name, PERSON_NAME_MAX_CHARS)?;
        if self.address.trim().is_empty() {
            return Err(FieldError::MissingField("address"));
        }
        form::check_min("phone number", self.phone, 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub hotel_id: i64,
    pub room_no: i64,
    pub room_type: String,
}

impl Room {
    pub fn validate(&self) -> Result<(), FieldError> {
        check_required("room type", &self.room_type, ROOM_TYPE_MAX_CHARS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceCompany {
    pub company_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub is_certified: bool,
}

impl MaintenanceCompany {
    pub fn validate(&self) -> Result<(), FieldError> {
        check_required("company name", &self.name, COMPANY_NAME_MAX_CHARS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repair {
    pub repair_id: i64,
    pub hotel_id: i64,
    pub room_no: i64,
    pub company_id: i64,
    pub repair_date: CalendarDate,
    pub description: Option<String>,
    pub repair_type: String,
}

impl Repair {
    pub fn validate(&self) -> Result<(), FieldError> {
        check_required("repair type", &self.repair_type, REPAIR_TYPE_MAX_CHARS)
    }
}

/// A room booking. `price` is the total charged for the booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: i64,
    pub customer_id: i64,
    pub hotel_id: i64,
    pub room_no: i64,
    pub booking_date: CalendarDate,
    pub people: i64,
    pub price: f64,
}

impl Booking {
    pub fn validate(&self) -> Result<(), FieldError> {
        form::check_min("number of people", self.people, 1)?;
        form::check_min_decimal("price", self.price, 0.0)
    }
}

/// House-cleaning staff assigned to a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: i64,
    pub staff_id: i64,
    pub hotel_id: i64,
    pub room_no: i64,
}

/// Manager request for an existing repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairRequest {
    pub request_id: i64,
    pub manager_id: i64,
    pub repair_id: i64,
    pub request_date: CalendarDate,
    pub description: Option<String>,
}

fn check_required(field: &'static str, value: &str, max_chars: usize) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::MissingField(field));
    }
    form::check_length(field, value, max_chars)
}

#[cfg(test)]
mod tests {
    use super::{Booking, Customer, Gender, Room};
    use crate::calendar::validate;
    use crate::form::FieldError;

    fn customer() -> Customer {
        Customer {
            customer_id: 1,
            first_name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            address: "1 Main St".to_string(),
            phone: 5_551_234,
            date_of_birth: validate(1990, 6, 15).unwrap(),
            gender: Gender::Female,
        }
    }

    #[test]
    fn valid_customer_passes() {
        assert!(customer().validate().is_ok());
    }

    #[test]
    fn last_name_length_is_checked() {
        let mut record = customer();
        record.last_name = "x".repeat(31);
        assert!(matches!(
            record.validate(),
            Err(FieldError::FieldTooLong {
                field: "last name",
                ..
            })
        ));
    }

    #[test]
    fn blank_address_is_missing() {
        let mut record = customer();
        record.address = "  ".to_string();
        assert_eq!(
            record.validate().unwrap_err(),
            FieldError::MissingField("address")
        );
    }

    #[test]
    fn room_type_is_limited_to_ten_characters() {
        let room = Room {
            hotel_id: 1,
            room_no: 101,
            room_type: "Presidential".to_string(),
        };
        assert!(matches!(
            room.validate(),
            Err(FieldError::FieldTooLong { max: 10, .. })
        ));
    }

    #[test]
    fn booking_needs_people_and_non_negative_price() {
        let mut booking = Booking {
            booking_id: 1,
            customer_id: 1,
            hotel_id: 1,
            room_no: 101,
            booking_date: validate(2024, 5, 1).unwrap(),
            people: 0,
            price: 10.0,
        };
        assert!(booking.validate().is_err());
        booking.people = 2;
        booking.price = -0.5;
        assert!(booking.validate().is_err());
        booking.price = 0.0;
        assert!(booking.validate().is_ok());
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Other".parse::<Gender>().unwrap(), Gender::Other);
        assert!("unknown".parse::<Gender>().is_err());
    }
}
