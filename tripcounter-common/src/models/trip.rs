use chrono::NaiveDate;
use serde::Serialize;

use crate::gateway::Row;

use super::{
    cell, format_money, parse_date, parse_f64, parse_u32, round2, RowParseError,
};

/// Fixed surcharge applied when a trip involves the airport.
pub const AIRPORT_FEE: f64 = 6.50;

pub const TABLE_KEY: &str = "tripcounter_trips";
pub const HEADERS: &[&str] = &[
    "date",
    "number",
    "start_time",
    "end_time",
    "fare",
    "tip",
    "airport_fee",
    "total",
];

/// One completed trip. Immutable once appended; `number` is the dense
/// per-date sequence assigned at insert time.
#[derive(Debug, Clone, Serialize)]
pub struct TripRecord {
    pub date: NaiveDate,
    pub number: u32,
    pub start_time: String,
    pub end_time: String,
    pub fare: f64,
    pub tip: f64,
    pub airport_fee: f64,
    pub total: f64,
}

/// Validated trip input, before sequencing and duplicate checks.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub fare: f64,
    pub tip: f64,
    pub airport: bool,
}

impl TripRecord {
    pub fn build(new_trip: &NewTrip, number: u32) -> Self {
        let airport_fee = if new_trip.airport { AIRPORT_FEE } else { 0.0 };

        Self {
            date: new_trip.date,
            number,
            start_time: new_trip.start_time.clone(),
            end_time: new_trip.end_time.clone(),
            fare: new_trip.fare,
            tip: new_trip.tip,
            airport_fee,
            total: round2(new_trip.fare + new_trip.tip + airport_fee),
        }
    }

    pub fn from_row(row: &Row) -> Result<Self, RowParseError> {
        Ok(Self {
            date: parse_date(row, TABLE_KEY, "date")?,
            number: parse_u32(row, TABLE_KEY, "number")?,
            start_time: String::from(cell(row, "start_time")),
            end_time: String::from(cell(row, "end_time")),
            fare: parse_f64(row, TABLE_KEY, "fare")?,
            tip: parse_f64(row, TABLE_KEY, "tip")?,
            airport_fee: parse_f64(row, TABLE_KEY, "airport_fee")?,
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
            format_money(self.tip),
            format_money(self.airport_fee),
            format_money(self.total),
        ]
    }
}
