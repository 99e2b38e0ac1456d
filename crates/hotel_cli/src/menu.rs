//! Main menu loop.
//!
//! # Responsibility
//! - Map the numbered menu entries onto `HotelService` calls.
//! - Collect and validate every field through `Prompter` before calling core.
//!
//! # Invariants
//! - Service failures are printed and the menu continues; nothing is retried.
//! - End of input leaves the loop like the Exit entry.

use crate::formatter::{format_rows, OutputFormat};
use crate::prompt::{LineSource, PromptError, PromptResult, Prompter};
use hotel_core::form;
use hotel_core::model::hotel::{
    COMPANY_NAME_MAX_CHARS, PERSON_NAME_MAX_CHARS, REPAIR_TYPE_MAX_CHARS, ROOM_TYPE_MAX_CHARS,
};
use hotel_core::{
    AssignStaffRequest, Booking, Customer, DateRange, Gender, HotelRepository, HotelService,
    MaintenanceCompany, Repair, RepairRequestInput, Room, RowSet, ServiceResult,
    StatementExecutor,
};
use std::io::Write;

const MENU_TEXT: &str = "MAIN MENU
---------
1. Add new customer
2. Add new room
3. Add new maintenance company
4. Add new repair
5. Add new booking
6. Assign house cleaning staff to a room
7. Raise a repair request
8. Get number of available rooms
9. Get number of booked rooms
10. Get hotel bookings for a week
11. Get top k rooms with highest price for a date range
12. Get top k highest booking prices for a customer
13. Get customer total cost for a date range
14. List the repairs made by a maintenance company
15. Get top k maintenance companies by repair count
16. Get number of repairs per year for a hotel room
17. < EXIT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddCustomer,
    AddRoom,
    AddCompany,
    AddRepair,
    BookRoom,
    AssignHouseCleaning,
    RaiseRepairRequest,
    AvailableRooms,
    BookedRooms,
    WeekBookings,
    TopRoomPrices,
    TopCustomerBookings,
    TotalCost,
    RepairsByCompany,
    TopCompanies,
    RepairsPerYear,
    Exit,
}

impl MenuChoice {
    pub fn from_number(number: i64) -> Option<Self> {
        let choice = match number {
            1 => Self::AddCustomer,
            2 => Self::AddRoom,
            3 => Self::AddCompany,
            4 => Self::AddRepair,
            5 => Self::BookRoom,
            6 => Self::AssignHouseCleaning,
            7 => Self::RaiseRepairRequest,
            8 => Self::AvailableRooms,
            9 => Self::BookedRooms,
            10 => Self::WeekBookings,
            11 => Self::TopRoomPrices,
            12 => Self::TopCustomerBookings,
            13 => Self::TotalCost,
            14 => Self::RepairsByCompany,
            15 => Self::TopCompanies,
            16 => Self::RepairsPerYear,
            17 => Self::Exit,
            _ => return None,
        };
        Some(choice)
    }
}

pub struct Menu<'svc, R, E, In, Out>
where
    R: HotelRepository,
    E: StatementExecutor,
{
    service: &'svc HotelService<R, E>,
    prompter: Prompter<In, Out>,
    format: OutputFormat,
}

impl<'svc, R, E, In, Out> Menu<'svc, R, E, In, Out>
where
    R: HotelRepository,
    E: StatementExecutor,
    In: LineSource,
    Out: Write,
{
    pub fn new(
        service: &'svc HotelService<R, E>,
        prompter: Prompter<In, Out>,
        format: OutputFormat,
    ) -> Self {
        Self {
            service,
            prompter,
            format,
        }
    }

    /// Runs until Exit or end of input. Only terminal I/O errors escape.
    pub fn run(&mut self) -> PromptResult<()> {
        loop {
            match self.run_once() {
                Ok(true) => continue,
                Ok(false) | Err(PromptError::Closed) => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    pub fn into_prompter(self) -> Prompter<In, Out> {
        self.prompter
    }

    /// Shows the menu and runs one entry. Returns `false` on Exit.
    fn run_once(&mut self) -> PromptResult<bool> {
        writeln!(self.prompter.output(), "\n{MENU_TEXT}")?;
        let raw = self.prompter.line("Please make your choice: ")?;
        let choice = raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(MenuChoice::from_number);
        let Some(choice) = choice else {
            writeln!(self.prompter.output(), "Unrecognized choice!")?;
            return Ok(true);
        };

        match choice {
            MenuChoice::AddCustomer => self.add_customer()?,
            MenuChoice::AddRoom => self.add_room()?,
            MenuChoice::AddCompany => self.add_company()?,
            MenuChoice::AddRepair => self.add_repair()?,
            MenuChoice::BookRoom => self.book_room()?,
            MenuChoice::AssignHouseCleaning => self.assign_house_cleaning()?,
            MenuChoice::RaiseRepairRequest => self.raise_repair_request()?,
            MenuChoice::AvailableRooms => {
                let hotel_id = self.hotel_id()?;
                let result = self.service.available_rooms(hotel_id);
                self.show(result)?;
            }
            MenuChoice::BookedRooms => {
                let hotel_id = self.hotel_id()?;
                let result = self.service.booked_rooms(hotel_id);
                self.show(result)?;
            }
            MenuChoice::WeekBookings => {
                let hotel_id = self.hotel_id()?;
                let start = self.prompter.ask_date("week start date", "Week start date")?;
                let result = self.service.bookings_for_week(hotel_id, start);
                self.show(result)?;
            }
            MenuChoice::TopRoomPrices => {
                let range = self.date_range()?;
                let k = self.top_k()?;
                let result = self.service.top_room_prices(range, k);
                self.show(result)?;
            }
            MenuChoice::TopCustomerBookings => {
                let customer_id = self.customer_id()?;
                let k = self.top_k()?;
                let result = self.service.top_customer_bookings(customer_id, k);
                self.show(result)?;
            }
            MenuChoice::TotalCost => {
                let hotel_id = self.hotel_id()?;
                let customer_id = self.customer_id()?;
                let range = self.date_range()?;
                let result = self.service.total_cost(customer_id, hotel_id, range);
                self.show(result)?;
            }
            MenuChoice::RepairsByCompany => {
                let company_id = self.company_id()?;
                let result = self.service.repairs_by_company(company_id);
                self.show(result)?;
            }
            MenuChoice::TopCompanies => {
                let k = self.top_k()?;
                let result = self.service.top_maintenance_companies(k);
                self.show(result)?;
            }
            MenuChoice::RepairsPerYear => {
                let hotel_id = self.hotel_id()?;
                let room_no = self.room_no()?;
                let result = self.service.repairs_per_year(hotel_id, room_no);
                self.show(result)?;
            }
            MenuChoice::Exit => return Ok(false),
        }
        Ok(true)
    }

    fn add_customer(&mut self) -> PromptResult<()> {
        let customer = Customer {
            customer_id: self.customer_id()?,
            first_name: self.prompter.ask("Input customer first name: ", |raw| {
                form::required_text("first name", raw, PERSON_NAME_MAX_CHARS)
            })?,
            last_name: self.prompter.ask("Input customer last name: ", |raw| {
                form::required_text("last name", raw, PERSON_NAME_MAX_CHARS)
            })?,
            address: self.prompter.ask("Input customer address: ", |raw| {
                form::required_text("address", raw, usize::MAX)
            })?,
            phone: self.prompter.ask("Input customer phone number: ", |raw| {
                form::parse_positive("phone number", raw)
            })?,
            date_of_birth: self.prompter.ask_date("date of birth", "Customer date of birth")?,
            gender: self.prompter.ask(
                &format!("Input customer gender ({}): ", Gender::CHOICES),
                |raw| form::parse_choice::<Gender>("gender", raw, Gender::CHOICES),
            )?,
        };
        let result = self.service.add_customer(&customer);
        self.confirm(result, "Customer added.")
    }

    fn add_room(&mut self) -> PromptResult<()> {
        let room = Room {
            hotel_id: self.hotel_id()?,
            room_no: self.room_no()?,
            room_type: self.prompter.ask("Input the room type: ", |raw| {
                form::required_text("room type", raw, ROOM_TYPE_MAX_CHARS)
            })?,
        };
        let result = self.service.add_room(&room);
        self.confirm(result, "Room added.")
    }

    fn add_company(&mut self) -> PromptResult<()> {
        let company = MaintenanceCompany {
            company_id: self.company_id()?,
            name: self.prompter.ask("Input company name: ", |raw| {
                form::required_text("company name", raw, COMPANY_NAME_MAX_CHARS)
            })?,
            address: self.prompter.ask("Input company address (optional): ", |raw| {
                form::optional_text("company address", raw, None)
            })?,
            is_certified: self.prompter.ask("Is this company certified? (y/n): ", |raw| {
                form::parse_yes_no("certified", raw)
            })?,
        };
        let result = self.service.add_maintenance_company(&company);
        self.confirm(result, "Maintenance company added.")
    }

    fn add_repair(&mut self) -> PromptResult<()> {
        let repair = Repair {
            repair_id: self.repair_id()?,
            hotel_id: self.hotel_id()?,
            room_no: self.room_no()?,
            company_id: self.company_id()?,
            repair_date: self.prompter.ask_date("repair date", "Repair date")?,
            description: self.prompter.ask("Input repair description (optional): ", |raw| {
                form::optional_text("repair description", raw, None)
            })?,
            repair_type: self.prompter.ask("Input repair type: ", |raw| {
                form::required_text("repair type", raw, REPAIR_TYPE_MAX_CHARS)
            })?,
        };
        let result = self.service.add_repair(&repair);
        self.confirm(result, "Repair added.")
    }

    fn book_room(&mut self) -> PromptResult<()> {
        let customer_id = self.customer_id()?;
        let hotel_id = self.hotel_id()?;
        let room_no = self.room_no()?;

        match self.service.find_booking(customer_id, hotel_id, room_no) {
            Ok(Some(booking_id)) => {
                return writeln!(
                    self.prompter.output(),
                    "Booking {booking_id} already exists for this customer and room."
                )
                .map_err(PromptError::from);
            }
            Ok(None) => {}
            Err(err) => return self.fail(&err.to_string()),
        }

        let create = self.prompter.ask(
            "Your booking does not exist yet. Create a new booking? (y/n): ",
            |raw| form::parse_yes_no("create booking", raw),
        )?;
        if !create {
            return Ok(());
        }

        let booking = Booking {
            booking_id: self.prompter.ask("Input booking number: ", |raw| {
                form::parse_positive("booking number", raw)
            })?,
            customer_id,
            hotel_id,
            room_no,
            booking_date: self.prompter.ask_date("booking date", "Booking date")?,
            people: self.prompter.ask("Input the number of people: ", |raw| {
                form::parse_positive("number of people", raw)
            })?,
            price: self.prompter.ask("Input the price: ", |raw| {
                form::parse_decimal("price", raw, 0.0)
            })?,
        };
        let result = self.service.book_room(&booking);
        self.confirm(result, "Booking added.")
    }

    fn assign_house_cleaning(&mut self) -> PromptResult<()> {
        let request = AssignStaffRequest {
            staff_id: self.ssn("Input staff SSN: ")?,
            hotel_id: self.hotel_id()?,
            room_no: self.room_no()?,
        };
        match self.service.assign_house_cleaning(request) {
            Ok(assignment) => writeln!(
                self.prompter.output(),
                "Assignment {} created.",
                assignment.assignment_id
            )
            .map_err(PromptError::from),
            Err(err) => self.fail(&err.to_string()),
        }
    }

    fn raise_repair_request(&mut self) -> PromptResult<()> {
        let input = RepairRequestInput {
            hotel_id: self.hotel_id()?,
            manager_id: self.ssn("Input manager SSN: ")?,
            room_no: self.room_no()?,
            repair_id: self.repair_id()?,
            request_date: self.prompter.ask_date("request date", "Request date")?,
            description: self.prompter.ask("Input a description (optional): ", |raw| {
                form::optional_text("request description", raw, None)
            })?,
        };
        match self.service.raise_repair_request(input) {
            Ok(request) => writeln!(
                self.prompter.output(),
                "Repair request {} created.",
                request.request_id
            )
            .map_err(PromptError::from),
            Err(err) => self.fail(&err.to_string()),
        }
    }

    fn date_range(&mut self) -> PromptResult<DateRange> {
        let start = self.prompter.ask_date("start date", "Start date of the range")?;
        let end = self.prompter.ask_date("end date", "End date of the range")?;
        Ok(DateRange { start, end })
    }

    fn customer_id(&mut self) -> PromptResult<i64> {
        self.prompter.ask("Input customer ID: ", |raw| {
            form::parse_positive("customer id", raw)
        })
    }

    fn hotel_id(&mut self) -> PromptResult<i64> {
        self.prompter.ask("Input hotel ID: ", |raw| {
            form::parse_positive("hotel id", raw)
        })
    }

    fn room_no(&mut self) -> PromptResult<i64> {
        self.prompter.ask("Input room number: ", |raw| {
            form::parse_positive("room number", raw)
        })
    }

    fn company_id(&mut self) -> PromptResult<i64> {
        self.prompter.ask("Input maintenance company ID: ", |raw| {
            form::parse_positive("company id", raw)
        })
    }

    fn repair_id(&mut self) -> PromptResult<i64> {
        self.prompter.ask("Input repair ID: ", |raw| {
            form::parse_positive("repair id", raw)
        })
    }

    fn ssn(&mut self, label: &str) -> PromptResult<i64> {
        self.prompter.ask(label, |raw| form::parse_positive("ssn", raw))
    }

    /// `k` is checked here so bad input re-prompts instead of failing the report.
    fn top_k(&mut self) -> PromptResult<i64> {
        self.prompter.ask("Input k: ", |raw| form::parse_positive("k", raw))
    }

    fn show(&mut self, result: ServiceResult<RowSet>) -> PromptResult<()> {
        match result {
            Ok(rows) => {
                let text = format_rows(&rows, self.format);
                writeln!(self.prompter.output(), "{text}").map_err(PromptError::from)
            }
            Err(err) => self.fail(&err.to_string()),
        }
    }

    fn confirm(&mut self, result: ServiceResult<()>, message: &str) -> PromptResult<()> {
        match result {
            Ok(()) => writeln!(self.prompter.output(), "{message}").map_err(PromptError::from),
            Err(err) => self.fail(&err.to_string()),
        }
    }

    fn fail(&mut self, message: &str) -> PromptResult<()> {
        writeln!(self.prompter.output(), "Query failed: {message}").map_err(PromptError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::{Menu, MenuChoice};
    use crate::formatter::OutputFormat;
    use crate::prompt::Prompter;
    use hotel_core::{open_db_in_memory, HotelReports, HotelService, SqlHotelRepository};
    use rusqlite::Connection;
    use std::io::Cursor;

    const SEED: &str = "
        INSERT INTO Hotel (hotelID, address) VALUES (1, 'Pier 1');
        INSERT INTO Staff (SSN, fName, lName, role, employerID) VALUES
            (500, 'Ana', 'Ruiz', 'HouseCleaning', 1),
            (600, 'Bo', 'Chen', 'Manager', 1);
        INSERT INTO Room (hotelID, roomNo, roomType) VALUES (1, 101, 'Suite'), (1, 102, 'Single');
    ";

    fn seeded() -> Connection {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(SEED).unwrap();
        conn
    }

    fn run_script(conn: &Connection, script: &str) -> String {
        let service = HotelService::new(
            SqlHotelRepository::from_connection(conn),
            HotelReports::from_connection(conn),
        );
        let prompter = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let mut menu = Menu::new(&service, prompter, OutputFormat::Json);
        menu.run().unwrap();
        let mut prompter = menu.into_prompter();
        String::from_utf8(prompter.output().clone()).unwrap()
    }

    #[test]
    fn menu_numbers_cover_all_entries() {
        assert_eq!(MenuChoice::from_number(1), Some(MenuChoice::AddCustomer));
        assert_eq!(MenuChoice::from_number(16), Some(MenuChoice::RepairsPerYear));
        assert_eq!(MenuChoice::from_number(17), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::from_number(0), None);
        assert_eq!(MenuChoice::from_number(18), None);
    }

    #[test]
    fn unrecognized_choice_then_exit() {
        let conn = seeded();
        let transcript = run_script(&conn, "42\nabc\n17\n");
        assert_eq!(transcript.matches("Unrecognized choice!").count(), 2);
    }

    #[test]
    fn end_of_input_leaves_menu() {
        let conn = seeded();
        let transcript = run_script(&conn, "");
        assert!(transcript.contains("Please make your choice"));
    }

    #[test]
    fn booking_flow_creates_then_reports_existing() {
        let conn = seeded();
        conn.execute_batch(
            "INSERT INTO Customer (customerID, fName, lName, Address, phNo, DOB, gender)
             VALUES (7, 'Ana', 'Silva', 'Main St', 5550101, '1990-05-10', 'Female');",
        )
        .unwrap();

        let script = "5\n7\n1\n101\ny\n900\n2024\n3\n15\n2\n199.5\n\
                      5\n7\n1\n101\n\
                      17\n";
        let transcript = run_script(&conn, script);
        assert!(transcript.contains("Booking added."));
        assert!(transcript.contains("Booking 900 already exists"));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM Booking;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn invalid_room_type_reprompts_before_insert() {
        let conn = seeded();
        let script = "2\n1\n103\nPresidentialSuite\nDeluxe\n17\n";
        let transcript = run_script(&conn, script);
        assert!(transcript.contains("cannot be longer than 10 characters"));
        assert!(transcript.contains("Room added."));
    }

    #[test]
    fn available_rooms_report_prints_json_rows() {
        let conn = seeded();
        let transcript = run_script(&conn, "8\n1\n17\n");
        assert!(transcript.contains("\"available_rooms\": \"2\""));
    }

    #[test]
    fn wrong_role_assignment_fails_and_continues() {
        let conn = seeded();
        let transcript = run_script(&conn, "6\n600\n1\n101\n6\n500\n1\n101\n17\n");
        assert!(transcript.contains("Query failed: staff member 600 has role `Manager`"));
        assert!(transcript.contains("Assignment 2001 created."));
    }
}
