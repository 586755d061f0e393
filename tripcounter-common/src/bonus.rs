//! Day-of-week trip bonus rules.
//!
//! Each weekday maps to a tier table of (trip-count threshold, payout).
//! Thresholds stack: every threshold the day's trip count meets pays out,
//! not just the highest one. A Monday with 21 trips earns 16 + 9 + 12 = 37.
//! The stacking is intentional and load-bearing for payouts.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::round2;

/// Monday through Thursday. Threshold -> payout, ascending.
pub const TIER_A: &[(u32, f64)] = &[(13, 16.0), (17, 9.0), (21, 12.0), (25, 16.0)];

/// Friday and Saturday.
pub const TIER_B: &[(u32, f64)] = &[(13, 15.0), (17, 10.0), (21, 13.0), (25, 15.0)];

/// Sunday.
pub const TIER_C: &[(u32, f64)] = &[(12, 14.0), (16, 10.0), (19, 11.0), (23, 14.0)];

pub fn tier_for(weekday: Weekday) -> &'static [(u32, f64)] {
    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => TIER_A,
        Weekday::Fri | Weekday::Sat => TIER_B,
        Weekday::Sun => TIER_C,
    }
}

/// Cumulative bonus payable for `date` given that day's trip count.
pub fn compute_bonus(date: NaiveDate, trip_count: u32) -> f64 {
    let bonus = tier_for(date.weekday())
        .iter()
        .filter(|(threshold, _)| trip_count >= *threshold)
        .map(|(_, payout)| payout)
        .sum();

    round2(bonus)
}
