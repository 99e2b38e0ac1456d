use hotel_core::statement::BuildError;
use hotel_core::{open_db_in_memory, CalendarDate, DateRange, HotelReports, RepoError, RowSet};
use rusqlite::Connection;

const SEED: &str = "
    INSERT INTO Hotel (hotelID, address) VALUES (1, 'Pier 1'), (2, 'Hill Rd');
    INSERT INTO Room (hotelID, roomNo, roomType) VALUES
        (1, 101, 'Suite'), (1, 102, 'Single'), (1, 103, 'Double'), (2, 201, 'Suite');
    INSERT INTO Customer (customerID, fName, lName, Address, phNo, DOB, gender) VALUES
        (7, 'Ana', 'Silva', 'Main St', 5550101, '1990-05-10', 'Female'),
        (8, 'Ben', 'Okafor', 'Bay Rd', 5550102, '1985-11-02', 'Male');
    INSERT INTO MaintenanceCompany (cmpID, name, address, isCertified) VALUES
        (10, 'FixIt', NULL, 1), (11, 'Pipes', 'Dock 4', 0), (12, 'Idle Co', NULL, 0);
    INSERT INTO Booking (bID, customer, hotelID, roomNo, bookingDate, noOfPeople, price) VALUES
        (900, 7, 1, 101, '2024-03-15', 2, 199.5),
        (901, 7, 1, 102, '2024-03-20', 1, 120.0),
        (902, 8, 1, 101, '2024-03-22', 3, 250.0),
        (903, 7, 2, 201, '2024-04-01', 2, 400.0);
    INSERT INTO Repair (rID, hotelID, roomNo, mCompany, repairDate, description, repairType) VALUES
        (30, 1, 101, 10, '2023-06-01', NULL, 'Plumbing'),
        (31, 1, 101, 10, '2024-01-10', 'Wiring', 'Electrical'),
        (32, 1, 102, 11, '2024-02-02', NULL, 'Painting'),
        (33, 1, 101, 10, '2024-05-05', NULL, 'Plumbing');
";

fn seeded() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(SEED).unwrap();
    conn
}

fn date(text: &str) -> CalendarDate {
    text.parse().unwrap()
}

fn march() -> DateRange {
    DateRange {
        start: date("2024-03-01"),
        end: date("2024-03-31"),
    }
}

fn column(rows: &RowSet, name: &str) -> Vec<String> {
    (0..rows.len())
        .map(|index| rows.cell(index, name).unwrap().to_string())
        .collect()
}

fn decimal(rows: &RowSet, index: usize, name: &str) -> f64 {
    rows.cell(index, name).unwrap().parse().unwrap()
}

#[test]
fn available_rooms_counts_never_booked_rooms() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.available_rooms(1).unwrap();
    assert_eq!(rows.cell(0, "available_rooms"), Some("1"));

    let rows = reports.available_rooms(3).unwrap();
    assert_eq!(rows.cell(0, "available_rooms"), Some("0"));
}

#[test]
fn booked_rooms_counts_distinct_rooms() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.booked_rooms(1).unwrap();
    assert_eq!(rows.cell(0, "booked_rooms"), Some("2"));
}

#[test]
fn week_window_includes_start_and_excludes_seventh_day() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.bookings_for_week(1, date("2024-03-15")).unwrap();
    assert_eq!(column(&rows, "bID"), ["900", "901"]);
    assert_eq!(column(&rows, "roomNo"), ["101", "102"]);
}

#[test]
fn week_window_rolls_over_month_end() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.bookings_for_week(2, date("2024-03-28")).unwrap();
    assert_eq!(column(&rows, "bID"), ["903"]);
    assert_eq!(column(&rows, "bookingDate"), ["2024-04-01"]);
}

#[test]
fn week_past_last_supported_year_is_a_validation_error() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let err = reports
        .bookings_for_week(1, date("9999-12-30"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn top_room_prices_ranks_rooms_within_range() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.top_room_prices(march(), 2).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(column(&rows, "roomNo"), ["101", "102"]);
    assert_eq!(decimal(&rows, 0, "price"), 250.0);
    assert_eq!(decimal(&rows, 1, "price"), 120.0);

    let rows = reports.top_room_prices(march(), 1).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn negative_k_is_rejected_before_querying() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    assert_eq!(
        reports.top_room_prices(march(), -1).unwrap_err(),
        RepoError::Build(BuildError::InvalidLimit("-1".to_string()))
    );
    assert!(matches!(
        reports.top_companies(-3),
        Err(RepoError::Build(BuildError::InvalidLimit(_)))
    ));
    assert!(matches!(
        reports.top_customer_bookings(7, -2),
        Err(RepoError::Build(BuildError::InvalidLimit(_)))
    ));
}

#[test]
fn top_customer_bookings_orders_by_price() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.top_customer_bookings(7, 2).unwrap();
    assert_eq!(column(&rows, "bID"), ["903", "900"]);
    assert_eq!(
        rows.columns,
        ["bID", "hotelID", "roomNo", "bookingDate", "price"]
    );
}

#[test]
fn total_cost_sums_range_and_defaults_to_zero() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.total_cost(7, 1, march()).unwrap();
    assert_eq!(decimal(&rows, 0, "total_cost"), 319.5);

    let empty = DateRange {
        start: date("2025-01-01"),
        end: date("2025-12-31"),
    };
    let rows = reports.total_cost(7, 1, empty).unwrap();
    assert_eq!(decimal(&rows, 0, "total_cost"), 0.0);
}

#[test]
fn repairs_by_company_lists_company_repairs() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.repairs_by_company(10).unwrap();
    assert_eq!(column(&rows, "rID"), ["30", "31", "33"]);
    assert_eq!(column(&rows, "name"), ["FixIt", "FixIt", "FixIt"]);

    assert!(reports.repairs_by_company(12).unwrap().is_empty());
}

#[test]
fn top_companies_ranks_by_repair_count() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.top_companies(5).unwrap();
    assert_eq!(column(&rows, "name"), ["FixIt", "Pipes"]);
    assert_eq!(column(&rows, "repair_count"), ["3", "1"]);
}

#[test]
fn repairs_per_year_groups_by_calendar_year() {
    let conn = seeded();
    let reports = HotelReports::from_connection(&conn);

    let rows = reports.repairs_per_year(1, 101).unwrap();
    assert_eq!(column(&rows, "repair_year"), ["2023", "2024"]);
    assert_eq!(column(&rows, "repair_count"), ["1", "2"]);
}
