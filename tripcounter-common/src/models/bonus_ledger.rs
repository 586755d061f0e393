use chrono::NaiveDate;
use serde::Serialize;

use crate::gateway::Row;

use super::{format_money, parse_date, parse_f64, RowParseError};

pub const TABLE_KEY: &str = "tripcounter_bonus_ledger";
pub const HEADERS: &[&str] = &["date", "bonus_total"];

/// Cached per-date bonus, recomputed from scratch on every trip insert for
/// that date. Derived data, not a source-of-truth fact.
#[derive(Debug, Clone, Serialize)]
pub struct BonusLedgerEntry {
    pub date: NaiveDate,
    pub bonus_total: f64,
}

impl BonusLedgerEntry {
    pub fn from_row(row: &Row) -> Result<Self, RowParseError> {
        Ok(Self {
            date: parse_date(row, TABLE_KEY, "date")?,
            bonus_total: parse_f64(row, TABLE_KEY, "bonus_total")?,
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![self.date.to_string(), format_money(self.bonus_total)]
    }
}
