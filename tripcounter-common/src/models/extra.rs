use chrono::NaiveDate;
use serde::Serialize;

use crate::gateway::Row;

use super::{cell, format_money, parse_date, parse_f64, parse_u32, round2, RowParseError};

pub const TABLE_KEY: &str = "tripcounter_extras";
pub const HEADERS: &[&str] = &["date", "number", "start_time", "end_time", "fare", "total"];

/// An incidental earning outside the regular trip flow (no tip, no airport
/// surcharge). Sequenced per date independently of trips.
#[derive(Debug, Clone, Serialize)]
pub struct ExtraRecord {
    pub date: NaiveDate,
    pub number: u32,
    pub start_time: String,
    pub end_time: String,
    pub fare: f64,
    pub total: f64,
}

#[derive(Debug, Clone)]
pub struct NewExtra {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub fare: f64,
}

impl ExtraRecord {
    pub fn build(new_extra: &NewExtra, number: u32) -> Self {
        Self {
            date: new_extra.date,
            number,
            start_time: new_extra.start_time.clone(),
            end_time: new_extra.end_time.clone(),
            fare: new_extra.fare,
            total: round2(new_extra.fare),
        }
    }

    pub fn from_row(row: &Row) -> Result<Self, RowParseError> {
        Ok(Self {
            date: parse_date(row, TABLE_KEY, "date")?,
            number: parse_u32(row, TABLE_KEY, "number")?,
            start_time: String::from(cell(row, "start_time")),
            end_time: String::from(cell(row, "end_time")),
            fare: parse_f64(row, TABLE_KEY, "fare")?,
            total: parse_f64(row, TABLE_KEY, "total")?,
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.to_string(),
            self.number.to_string(),
            self.start_time.clone(),
            self.end_time.clone(),
            format_money(self.fare),
            format_money(self.total),
        ]
    }
}
