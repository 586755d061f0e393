use chrono::{NaiveDate, NaiveTime};
use std::fmt;

use crate::gateway::Row;

pub mod bonus_ledger;
pub mod budget_item;
pub mod expense;
pub mod extra;
pub mod monthly_summary;
pub mod odometer;
pub mod trip;

/// A gateway row that could not be parsed into its typed record. Daos log
/// these and skip the row rather than letting raw strings reach business
/// logic.
#[derive(Debug)]
pub struct RowParseError {
    pub table: &'static str,
    pub column: &'static str,
    pub value: String,
}

impl std::error::Error for RowParseError {}

impl fmt::Display for RowParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RowParseError: Column '{}' of table '{}' holds unparseable value '{}'",
            self.column, self.table, self.value
        )
    }
}

/// Rounds a monetary amount to 2 decimal places. Applied at record
/// construction and at aggregation return points, never mid-computation.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn format_money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Validates and normalizes an HH:MM clock time.
pub fn parse_clock_time(value: &str) -> Option<String> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()?;
    Some(time.format("%H:%M").to_string())
}

pub(crate) fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

pub(crate) fn parse_date(
    row: &Row,
    table: &'static str,
    column: &'static str,
) -> Result<NaiveDate, RowParseError> {
    let value = cell(row, column);
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| RowParseError {
        table,
        column,
        value: String::from(value),
    })
}

pub(crate) fn parse_f64(
    row: &Row,
    table: &'static str,
    column: &'static str,
) -> Result<f64, RowParseError> {
    let value = cell(row, column);

    if value.is_empty() {
        return Ok(0.0);
    }

    value.parse().map_err(|_| RowParseError {
        table,
        column,
        value: String::from(value),
    })
}

pub(crate) fn parse_u32(
    row: &Row,
    table: &'static str,
    column: &'static str,
) -> Result<u32, RowParseError> {
    let value = cell(row, column);

    value.parse().map_err(|_| RowParseError {
        table,
        column,
        value: String::from(value),
    })
}

pub(crate) fn parse_i64_opt(
    row: &Row,
    table: &'static str,
    column: &'static str,
) -> Result<Option<i64>, RowParseError> {
    let value = cell(row, column);

    if value.is_empty() {
        return Ok(None);
    }

    value.parse().map(Some).map_err(|_| RowParseError {
        table,
        column,
        value: String::from(value),
    })
}

pub(crate) fn parse_bool(row: &Row, column: &'static str) -> bool {
    matches!(cell(row, column).trim(), "true" | "True" | "TRUE")
}
