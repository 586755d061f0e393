use chrono::NaiveDate;
use serde::Serialize;

use crate::db::{self, DaoError, TableStore};
use crate::models::round2;

/// Single-date productivity snapshot.
///
/// Wire names (`total_km`, `net_income`, `productivity_per_km`,
/// `is_complete`) are the contract the report consumers already speak.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_trips: u32,
    pub gross_trip_income: f64,
    pub bonus: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_km: i64,
    pub net_income: f64,
    pub productivity_per_km: f64,
    pub is_complete: bool,
}

/// Builds the snapshot for one date.
///
/// The trip read is authoritative and fails the call; expense, odometer, and
/// bonus reads are best-effort and contribute zero values on failure so a
/// partially degraded backend still yields a summary.
pub async fn daily_summary(store: &TableStore, date: NaiveDate) -> Result<DailySummary, DaoError> {
    let trips = db::trips::Dao::new(store).trips_for_date(date).await?;

    let expenses = match db::expenses::Dao::new(store).expenses_for_date(date).await {
        Ok(expenses) => expenses,
        Err(e) => {
            log::warn!("Expense read failed for {date}; assuming none: {e}");
            Vec::new()
        }
    };

    let total_km = match db::odometer::Dao::new(store).entry_for_date(date).await {
        Ok(entry) => entry.and_then(|(_, e)| e.distance).unwrap_or(0),
        Err(e) => {
            log::warn!("Odometer read failed for {date}; assuming 0 km: {e}");
            0
        }
    };

    let bonus = match db::bonus_ledger::Dao::new(store).bonus_for_date(date).await {
        Ok(bonus) => bonus,
        Err(e) => {
            log::warn!("Bonus ledger read failed for {date}; assuming 0: {e}");
            0.0
        }
    };

    let total_trips = trips.len() as u32;
    let gross_trip_income: f64 = trips.iter().map(|t| t.total).sum();
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();

    let total_income = gross_trip_income + bonus;
    let net_income = total_income - total_expenses;
    let productivity_per_km = if total_km > 0 {
        net_income / total_km as f64
    } else {
        0.0
    };

    Ok(DailySummary {
        date,
        total_trips,
        gross_trip_income: round2(gross_trip_income),
        bonus: round2(bonus),
        total_income: round2(total_income),
        total_expenses: round2(total_expenses),
        total_km,
        net_income: round2(net_income),
        productivity_per_km: round2(productivity_per_km),
        is_complete: total_trips > 0 && total_km > 0,
    })
}
