//! Parameter-bound SQL statement construction.
//!
//! # Responsibility
//! - Render `INSERT` and filtered `SELECT` statements from a typed spec.
//! - Carry every value as a separately bound, type-tagged parameter.
//!
//! # Invariants
//! - Values never appear in statement text; only validated identifiers,
//!   keywords and `?N` placeholders do.
//! - `BoundStatement::placeholder_count() == BoundStatement::params().len()`.
//! - Text values are bound as-is (no truncation, no quoting).

use crate::calendar::CalendarDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?[0-9]+").expect("valid placeholder regex"));

/// Type-tagged value bound as a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Decimal(f64),
    Date(CalendarDate),
    Boolean(bool),
}

impl SqlValue {
    /// Stable type tag name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::Decimal(_) => "decimal",
            Self::Date(_) => "date",
            Self::Boolean(_) => "boolean",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<CalendarDate> for SqlValue {
    fn from(value: CalendarDate) -> Self {
        Self::Date(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Statement shape produced by [`build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    SelectByPredicate,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::SelectByPredicate => "select_by_predicate",
        }
    }
}

impl FromStr for OperationKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insert" => Ok(Self::Insert),
            "select" | "select_by_predicate" => Ok(Self::SelectByPredicate),
            _ => Err(BuildError::UnknownOperationKind(s.to_string())),
        }
    }
}

/// Comparison used by a predicate term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl ComparisonOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// One `column op value` filter term.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: ComparisonOp,
    pub value: SqlValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// Typed description of one statement.
///
/// For `Insert`, `columns` are the inserted (column, value) pairs.
/// For `SelectByPredicate`, `columns` are equality filters applied before
/// `predicates`; `projection` lists returned columns (empty selects `*`).
#[derive(Debug, Clone, PartialEq)]
pub struct StatementSpec {
    pub table: String,
    pub kind: OperationKind,
    pub columns: Vec<(String, SqlValue)>,
    pub projection: Vec<String>,
    pub predicates: Vec<Predicate>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<i64>,
}

impl StatementSpec {
    pub fn new(table: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            table: table.into(),
            kind,
            columns: Vec::new(),
            projection: Vec::new(),
            predicates: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn insert(table: impl Into<String>) -> Self {
        Self::new(table, OperationKind::Insert)
    }

    pub fn select(table: impl Into<String>) -> Self {
        Self::new(table, OperationKind::SelectByPredicate)
    }

    pub fn column(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.columns.push((name.into(), value.into()));
        self
    }

    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.projection.push(name.into());
        self
    }

    pub fn filter(
        mut self,
        column: impl Into<String>,
        op: ComparisonOp,
        value: impl Into<SqlValue>,
    ) -> Self {
        self.predicates.push(Predicate {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Statement text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    sql: String,
    params: Vec<SqlValue>,
}

impl BoundStatement {
    /// Wraps fixed SQL whose `?N` markers match `params`.
    ///
    /// Used for report queries that the builder cannot express (joins,
    /// aggregates). Callers own the placeholder/parameter agreement.
    pub fn from_parts(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Number of `?N` placeholders in the statement text.
    pub fn placeholder_count(&self) -> usize {
        PLACEHOLDER_RE.find_iter(&self.sql).count()
    }
}

/// Statement construction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Insert requested with no columns.
    EmptyColumnSet,
    /// Row limit is negative or not an integer.
    InvalidLimit(String),
    /// Operation kind text is not one of the supported kinds.
    UnknownOperationKind(String),
    /// Table or column name is not a plain SQL identifier.
    InvalidIdentifier(String),
    /// Clause does not apply to the operation kind (e.g. `LIMIT` on insert).
    UnsupportedClause {
        kind: OperationKind,
        clause: &'static str,
    },
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyColumnSet => write!(f, "insert requires at least one column"),
            Self::InvalidLimit(value) => {
                write!(f, "row limit `{value}` must be a non-negative integer")
            }
            Self::UnknownOperationKind(value) => write!(f, "unknown operation kind `{value}`"),
            Self::InvalidIdentifier(value) => write!(f, "invalid SQL identifier `{value}`"),
            Self::UnsupportedClause { kind, clause } => {
                write!(f, "{clause} is not supported for {}", kind.as_str())
            }
        }
    }
}

impl Error for BuildError {}

/// Parses raw limit input such as a "top k" prompt answer.
pub fn parse_limit(input: &str) -> Result<i64, BuildError> {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(BuildError::InvalidLimit(trimmed.to_string())),
    }
}

/// Builds a parameter-bound statement from `spec`.
///
/// # Errors
/// - `EmptyColumnSet` for an insert without columns.
/// - `InvalidLimit` for a negative limit.
/// - `InvalidIdentifier` when any table/column name is not a plain identifier.
/// - `UnsupportedClause` for filter/order/limit/projection on an insert.
pub fn build(spec: &StatementSpec) -> Result<BoundStatement, BuildError> {
    check_identifier(&spec.table)?;
    match spec.kind {
        OperationKind::Insert => build_insert(spec),
        OperationKind::SelectByPredicate => build_select(spec),
    }
}

fn build_insert(spec: &StatementSpec) -> Result<BoundStatement, BuildError> {
    if spec.columns.is_empty() {
        return Err(BuildError::EmptyColumnSet);
    }
    let unsupported = [
        (!spec.projection.is_empty(), "projection"),
        (!spec.predicates.is_empty(), "WHERE"),
        (spec.order_by.is_some(), "ORDER BY"),
        (spec.limit.is_some(), "LIMIT"),
    ];
    if let Some((_, clause)) = unsupported.into_iter().find(|(present, _)| *present) {
        return Err(BuildError::UnsupportedClause {
            kind: OperationKind::Insert,
            clause,
        });
    }

    let mut names = Vec::with_capacity(spec.columns.len());
    let mut placeholders = Vec::with_capacity(spec.columns.len());
    let mut params = Vec::with_capacity(spec.columns.len());
    for (index, (name, value)) in spec.columns.iter().enumerate() {
        check_identifier(name)?;
        names.push(name.as_str());
        placeholders.push(format!("?{}", index + 1));
        params.push(value.clone());
    }

    Ok(BoundStatement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({});",
            spec.table,
            names.join(", "),
            placeholders.join(", ")
        ),
        params,
    })
}

/// Checks that an already-typed row limit is non-negative.
pub fn check_limit(limit: i64) -> Result<i64, BuildError> {
    if limit < 0 {
        return Err(BuildError::InvalidLimit(limit.to_string()));
    }
    Ok(limit)
}

fn build_select(spec: &StatementSpec) -> Result<BoundStatement, BuildError> {
    if let Some(limit) = spec.limit {
        check_limit(limit)?;
    }

    for name in &spec.projection {
        check_identifier(name)?;
    }
    let projection = if spec.projection.is_empty() {
        "*".to_string()
    } else {
        spec.projection.join(", ")
    };

    let mut sql = format!("SELECT {projection} FROM {}", spec.table);
    let mut params: Vec<SqlValue> = Vec::new();
    let mut terms: Vec<String> = Vec::new();

    let equality_terms = spec
        .columns
        .iter()
        .map(|(name, value)| (name, ComparisonOp::Eq, value));
    let predicate_terms = spec
        .predicates
        .iter()
        .map(|term| (&term.column, term.op, &term.value));
    for (column, op, value) in equality_terms.chain(predicate_terms) {
        check_identifier(column)?;
        params.push(value.clone());
        terms.push(format!("{column} {} ?{}", op.as_sql(), params.len()));
    }
    if !terms.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&terms.join(" AND "));
    }

    if let Some(order) = &spec.order_by {
        check_identifier(&order.column)?;
        sql.push_str(&format!(
            " ORDER BY {} {}",
            order.column,
            order.direction.as_sql()
        ));
    }

    if let Some(limit) = spec.limit {
        params.push(SqlValue::Integer(limit));
        sql.push_str(&format!(" LIMIT ?{}", params.len()));
    }

    sql.push(';');
    Ok(BoundStatement { sql, params })
}

fn check_identifier(name: &str) -> Result<(), BuildError> {
    if IDENTIFIER_RE.is_match(name) {
        Ok(())
    } else {
        Err(BuildError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        build, parse_limit, BuildError, ComparisonOp, OperationKind, SortDirection, SqlValue,
        StatementSpec,
    };
    use crate::calendar::validate;

    #[test]
    fn insert_binds_values_in_column_order() {
        let spec = StatementSpec::insert("Customer")
            .column("customerID", 7_i64)
            .column("fName", "Ana");
        let bound = build(&spec).unwrap();

        assert_eq!(
            bound.sql(),
            "INSERT INTO Customer (customerID, fName) VALUES (?1, ?2);"
        );
        assert_eq!(bound.placeholder_count(), 2);
        assert_eq!(
            bound.params(),
            &[SqlValue::Integer(7), SqlValue::Text("Ana".to_string())]
        );
        assert!(!bound.sql().contains('7'));
        assert!(!bound.sql().contains("Ana"));
    }

    #[test]
    fn insert_without_columns_fails() {
        let err = build(&StatementSpec::insert("Customer")).unwrap_err();
        assert_eq!(err, BuildError::EmptyColumnSet);
    }

    #[test]
    fn insert_placeholders_match_params_for_any_width() {
        for width in 1..=40_usize {
            let spec = (0..width).fold(StatementSpec::insert("Wide"), |spec, index| {
                spec.column(format!("c{index}"), index as i64)
            });
            let bound = build(&spec).unwrap();
            assert_eq!(bound.params().len(), width);
            assert_eq!(bound.placeholder_count(), width);
        }
    }

    #[test]
    fn insert_rejects_select_only_clauses() {
        let spec = StatementSpec::insert("Room").column("hotelID", 1_i64).limit(3);
        assert!(matches!(
            build(&spec),
            Err(BuildError::UnsupportedClause { clause: "LIMIT", .. })
        ));
    }

    #[test]
    fn select_combines_equality_columns_predicates_order_and_limit() {
        let start = validate(2024, 1, 1).unwrap();
        let spec = StatementSpec::select("Booking")
            .project("bID")
            .project("price")
            .column("customer", 12_i64)
            .filter("bookingDate", ComparisonOp::GtEq, start)
            .order_by("price", SortDirection::Desc)
            .limit(5);
        let bound = build(&spec).unwrap();

        assert_eq!(
            bound.sql(),
            "SELECT bID, price FROM Booking WHERE customer = ?1 AND bookingDate >= ?2 ORDER BY price DESC LIMIT ?3;"
        );
        assert_eq!(
            bound.params(),
            &[
                SqlValue::Integer(12),
                SqlValue::Date(start),
                SqlValue::Integer(5)
            ]
        );
        assert_eq!(bound.placeholder_count(), bound.params().len());
    }

    #[test]
    fn select_without_filters_selects_everything() {
        let bound = build(&StatementSpec::select("Room")).unwrap();
        assert_eq!(bound.sql(), "SELECT * FROM Room;");
        assert!(bound.params().is_empty());
    }

    #[test]
    fn negative_limit_is_rejected() {
        let spec = StatementSpec::select("Booking").limit(-1);
        assert_eq!(
            build(&spec).unwrap_err(),
            BuildError::InvalidLimit("-1".to_string())
        );
    }

    #[test]
    fn zero_limit_is_allowed() {
        let bound = build(&StatementSpec::select("Booking").limit(0)).unwrap();
        assert_eq!(bound.params(), &[SqlValue::Integer(0)]);
    }

    #[test]
    fn parse_limit_accepts_only_non_negative_integers() {
        assert_eq!(parse_limit(" 3 ").unwrap(), 3);
        assert_eq!(parse_limit("0").unwrap(), 0);
        assert!(matches!(parse_limit("-2"), Err(BuildError::InvalidLimit(_))));
        assert!(matches!(
            parse_limit("5; DROP TABLE Room"),
            Err(BuildError::InvalidLimit(_))
        ));
        assert!(matches!(parse_limit(""), Err(BuildError::InvalidLimit(_))));
    }

    #[test]
    fn identifiers_are_validated() {
        let bad_table = StatementSpec::insert("Customer; DROP TABLE Room").column("a", 1_i64);
        assert!(matches!(
            build(&bad_table),
            Err(BuildError::InvalidIdentifier(_))
        ));

        let bad_column = StatementSpec::select("Customer").filter(
            "fName = 'x' OR 1",
            ComparisonOp::Eq,
            "y",
        );
        assert!(matches!(
            build(&bad_column),
            Err(BuildError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn values_with_quotes_stay_out_of_statement_text() {
        let spec = StatementSpec::insert("Customer").column("lName", "O'Brien'); --");
        let bound = build(&spec).unwrap();
        assert!(!bound.sql().contains("O'Brien"));
        assert_eq!(bound.params()[0], SqlValue::from("O'Brien'); --"));
    }

    #[test]
    fn operation_kind_parses_known_names_only() {
        assert_eq!(
            "INSERT".parse::<OperationKind>().unwrap(),
            OperationKind::Insert
        );
        assert_eq!(
            " select ".parse::<OperationKind>().unwrap(),
            OperationKind::SelectByPredicate
        );
        assert_eq!(
            "delete".parse::<OperationKind>().unwrap_err(),
            BuildError::UnknownOperationKind("delete".to_string())
        );
        assert_eq!(
            " Drop ".parse::<OperationKind>().unwrap_err(),
            BuildError::UnknownOperationKind(" Drop ".to_string())
        );
    }
}
