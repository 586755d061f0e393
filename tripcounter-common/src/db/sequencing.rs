//! Duplicate detection and dense per-date sequence numbering for trips and
//! extras. Both tables share the `date` / `start_time` / `end_time` columns
//! these functions key on.

use chrono::NaiveDate;

use crate::gateway::Row;
use crate::models::cell;

/// True when any existing row matches the exact (date, start, end) triple.
/// Full scan, exact string match only.
pub fn is_duplicate(rows: &[Row], date: NaiveDate, start_time: &str, end_time: &str) -> bool {
    let date = date.to_string();

    rows.iter().any(|row| {
        cell(row, "date") == date
            && cell(row, "start_time") == start_time
            && cell(row, "end_time") == end_time
    })
}

/// Next sequence number for `date`: 1 + count of existing rows for that
/// date. Recomputed from the live row count at insert time, not a stored
/// counter, so out-of-band deletions shift later numbers.
pub fn next_number(rows: &[Row], date: NaiveDate) -> u32 {
    let date = date.to_string();
    let same_date_count = rows.iter().filter(|row| cell(row, "date") == date).count();

    same_date_count as u32 + 1
}
