use chrono::NaiveDate;
use serde::Serialize;

use crate::gateway::Row;

use super::{cell, format_money, parse_date, parse_f64, RowParseError};

pub const TABLE_KEY: &str = "tripcounter_expenses";
pub const HEADERS: &[&str] = &["date", "time", "amount", "category", "description"];

/// A spent amount. Duplicates are permitted; rows are immutable.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub time: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

impl ExpenseRecord {
    pub fn from_row(row: &Row) -> Result<Self, RowParseError> {
        Ok(Self {
            date: parse_date(row, TABLE_KEY, "date")?,
            time: String::from(cell(row, "time")),
            amount: parse_f64(row, TABLE_KEY, "amount")?,
            category: String::from(cell(row, "category")),
            description: String::from(cell(row, "description")),
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.time.clone(),
            format_money(self.amount),
            self.category.clone(),
            self.description.clone(),
        ]
    }
}
