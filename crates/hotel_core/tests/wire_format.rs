use hotel_core::{build, Booking, CalendarDate, Gender, RowSet, SqlValue, StatementSpec};
use serde_json::json;

#[test]
fn booking_serializes_date_as_iso_text() {
    let booking = Booking {
        booking_id: 900,
        customer_id: 7,
        hotel_id: 1,
        room_no: 101,
        booking_date: "2024-02-29".parse().unwrap(),
        people: 2,
        price: 199.5,
    };

    let value = serde_json::to_value(&booking).unwrap();
    assert_eq!(value["booking_date"], "2024-02-29");
    assert_eq!(value["price"], 199.5);

    let back: Booking = serde_json::from_value(value).unwrap();
    assert_eq!(back, booking);
}

#[test]
fn invalid_calendar_date_fails_to_deserialize() {
    let err = serde_json::from_value::<CalendarDate>(json!("2023-02-29")).unwrap_err();
    assert!(err.to_string().contains("out of range"));
    assert!(serde_json::from_value::<CalendarDate>(json!("2023/02/28")).is_err());
}

#[test]
fn sql_values_are_type_tagged() {
    let date: CalendarDate = "2024-03-15".parse().unwrap();
    let values = vec![
        SqlValue::from(7_i64),
        SqlValue::from("Ana"),
        SqlValue::from(date),
        SqlValue::from(true),
    ];

    assert_eq!(
        serde_json::to_value(&values).unwrap(),
        json!([
            {"type": "integer", "value": 7},
            {"type": "text", "value": "Ana"},
            {"type": "date", "value": "2024-03-15"},
            {"type": "boolean", "value": true},
        ])
    );
}

#[test]
fn gender_uses_stored_spelling() {
    assert_eq!(serde_json::to_value(Gender::Other).unwrap(), json!("Other"));
}

#[test]
fn bound_statement_params_keep_column_order() {
    let statement = build(
        &StatementSpec::insert("Customer")
            .column("customerID", 7_i64)
            .column("fName", "Ana"),
    )
    .unwrap();

    let params = serde_json::to_value(statement.params()).unwrap();
    assert_eq!(params[0]["value"], 7);
    assert_eq!(params[1]["value"], "Ana");
    assert!(!statement.sql().contains("Ana"));
}

#[test]
fn row_set_serializes_columns_and_rows() {
    let rows = RowSet {
        columns: vec!["bID".to_string()],
        rows: vec![vec!["900".to_string()]],
    };
    assert_eq!(
        serde_json::to_value(&rows).unwrap(),
        json!({"columns": ["bID"], "rows": [["900"]]})
    );
}
