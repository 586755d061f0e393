use chrono::NaiveDate;
use serde::Serialize;

use crate::gateway::Row;

use super::{format_money, parse_date, parse_f64, parse_i64_opt, parse_u32, RowParseError};

pub const TABLE_KEY: &str = "tripcounter_monthly_summaries";
pub const HEADERS: &[&str] = &[
    "anchor_date",
    "month",
    "year",
    "total_km",
    "total_trips",
    "total_gross_income",
    "total_bonus",
    "total_expenses",
    "net_income",
    "productivity_per_km",
];

/// Persisted monthly rollup, upserted keyed by (month, year).
///
/// `total_gross_income` accumulates per-day income with bonus included; the
/// name is kept for continuity with the report consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub anchor_date: NaiveDate,
    pub month: u32,
    pub year: i32,
    pub total_km: i64,
    pub total_trips: u32,
    pub total_gross_income: f64,
    pub total_bonus: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub productivity_per_km: f64,
}

impl MonthlySummary {
    pub fn from_row(row: &Row) -> Result<Self, RowParseError> {
        let year = {
            let value = super::cell(row, "year");
            value.parse().map_err(|_| RowParseError {
                table: TABLE_KEY,
                column: "year",
                value: String::from(value),
            })?
        };

        Ok(Self {
            anchor_date: parse_date(row, TABLE_KEY, "anchor_date")?,
            month: parse_u32(row, TABLE_KEY, "month")?,
            year,
            total_km: parse_i64_opt(row, TABLE_KEY, "total_km")?.unwrap_or(0),
            total_trips: parse_u32(row, TABLE_KEY, "total_trips")?,
            total_gross_income: parse_f64(row, TABLE_KEY, "total_gross_income")?,
            total_bonus: parse_f64(row, TABLE_KEY, "total_bonus")?,
            total_expenses: parse_f64(row, TABLE_KEY, "total_expenses")?,
            net_income: parse_f64(row, TABLE_KEY, "net_income")?,
            productivity_per_km: parse_f64(row, TABLE_KEY, "productivity_per_km")?,
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.anchor_date.to_string(),
            self.month.to_string(),
            self.year.to_string(),
            self.total_km.to_string(),
            self.total_trips.to_string(),
            format_money(self.total_gross_income),
            format_money(self.total_bonus),
            format_money(self.total_expenses),
            format_money(self.net_income),
            format_money(self.productivity_per_km),
        ]
    }
}
