use chrono::NaiveDate;
use serde::Serialize;

use crate::gateway::Row;

use super::{cell, format_money, parse_bool, parse_f64, RowParseError};

pub const TABLE_KEY: &str = "tripcounter_budget";
pub const HEADERS: &[&str] = &["owner", "category", "amount", "due_date", "paid"];

/// 1-based column of the `paid` flag, for the positional mark-paid update.
pub const PAID_COLUMN: usize = 5;

/// A planned recurring payment owned by one user. `paid` only ever flips
/// false to true, via a positional cell update.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetItem {
    pub owner: String,
    pub category: String,
    pub amount: f64,
    // None marks a variable item with no fixed due date
    pub due_date: Option<NaiveDate>,
    pub paid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReminderKind {
    #[serde(rename = "3days")]
    ThreeDays,
    #[serde(rename = "due")]
    Due,
}

/// An upcoming-payment reminder shown on the home panel.
#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub category: String,
    pub amount: f64,
}

impl BudgetItem {
    pub fn from_row(row: &Row) -> Result<Self, RowParseError> {
        let due_date = {
            let value = cell(row, "due_date");
            if value.is_empty() {
                None
            } else {
                Some(
                    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| RowParseError {
                        table: TABLE_KEY,
                        column: "due_date",
                        value: String::from(value),
                    })?,
                )
            }
        };

        Ok(Self {
            owner: String::from(cell(row, "owner")),
            category: String::from(cell(row, "category")),
            amount: parse_f64(row, TABLE_KEY, "amount")?,
            due_date,
            paid: parse_bool(row, "paid"),
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.owner.clone(),
            self.category.clone(),
            format_money(self.amount),
            self.due_date.map(|d| d.to_string()).unwrap_or_default(),
            self.paid.to_string(),
        ]
    }

    /// Classifies the item into a reminder window relative to `today`. Paid
    /// items and items without a due date are never classified.
    pub fn reminder(&self, today: NaiveDate) -> Option<Reminder> {
        if self.paid {
            return None;
        }

        let due_date = self.due_date?;
        let days_left = (due_date - today).num_days();

        let kind = match days_left {
            3 => ReminderKind::ThreeDays,
            0 => ReminderKind::Due,
            _ => return None,
        };

        Some(Reminder {
            kind,
            category: self.category.clone(),
            amount: self.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(due_in_days: Option<i64>, paid: bool) -> (BudgetItem, NaiveDate) {
        let today = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();

        (
            BudgetItem {
                owner: String::from("driver@example.com"),
                category: String::from("rent"),
                amount: 350.0,
                due_date: due_in_days.map(|d| today + Duration::days(d)),
                paid,
            },
            today,
        )
    }

    #[test]
    fn due_in_three_days_classifies_as_three_days() {
        let (item, today) = item(Some(3), false);
        assert_eq!(item.reminder(today).unwrap().kind, ReminderKind::ThreeDays);
    }

    #[test]
    fn due_today_classifies_as_due() {
        let (item, today) = item(Some(0), false);
        assert_eq!(item.reminder(today).unwrap().kind, ReminderKind::Due);
    }

    #[test]
    fn paid_items_are_excluded_regardless_of_date() {
        let (due_today, today) = item(Some(0), true);
        assert!(due_today.reminder(today).is_none());

        let (due_soon, today) = item(Some(3), true);
        assert!(due_soon.reminder(today).is_none());
    }

    #[test]
    fn other_windows_and_variable_items_are_excluded() {
        let (tomorrow, today) = item(Some(1), false);
        assert!(tomorrow.reminder(today).is_none());

        let (overdue, today) = item(Some(-1), false);
        assert!(overdue.reminder(today).is_none());

        let (variable, today) = item(None, false);
        assert!(variable.reminder(today).is_none());
    }
}
