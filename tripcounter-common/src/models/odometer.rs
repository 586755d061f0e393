use chrono::NaiveDate;
use serde::Serialize;

use crate::gateway::Row;

use super::{cell, parse_date, parse_i64_opt, RowParseError};

pub const TABLE_KEY: &str = "tripcounter_odometer";
pub const HEADERS: &[&str] = &["date", "start_reading", "end_reading", "distance", "notes"];

/// One day's odometer record. Two-phase: created with only the start
/// reading, mutated in place when the day ends. At most one row per date.
#[derive(Debug, Clone, Serialize)]
pub struct OdometerEntry {
    pub date: NaiveDate,
    pub start_reading: i64,
    pub end_reading: Option<i64>,
    pub distance: Option<i64>,
    pub notes: String,
}

impl OdometerEntry {
    pub fn started(date: NaiveDate, start_reading: i64, notes: String) -> Self {
        Self {
            date,
            start_reading,
            end_reading: None,
            distance: None,
            notes,
        }
    }

    pub fn from_row(row: &Row) -> Result<Self, RowParseError> {
        Ok(Self {
            date: parse_date(row, TABLE_KEY, "date")?,
            start_reading: parse_i64_opt(row, TABLE_KEY, "start_reading")?.unwrap_or(0),
            end_reading: parse_i64_opt(row, TABLE_KEY, "end_reading")?,
            distance: parse_i64_opt(row, TABLE_KEY, "distance")?,
            notes: String::from(cell(row, "notes")),
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.start_reading.to_string(),
            self.end_reading.map(|v| v.to_string()).unwrap_or_default(),
            self.distance.map(|v| v.to_string()).unwrap_or_default(),
            self.notes.clone(),
        ]
    }
}
