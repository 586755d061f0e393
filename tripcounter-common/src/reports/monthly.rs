use chrono::{Datelike, NaiveDate};

use crate::db::{self, DaoError, TableStore};
use crate::models::monthly_summary::MonthlySummary;
use crate::models::round2;

use super::daily::{daily_summary, DailySummary};

/// A computed monthly rollup plus the per-day detail it was built from.
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub summary: MonthlySummary,
    pub details: Vec<DailySummary>,
}

/// Inclusive first and last day of the calendar month.
pub fn month_bounds(month: u32, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((first, first_of_next.pred_opt()?))
}

/// Rolls daily summaries up across a calendar month and persists the result.
///
/// Days are aggregated sequentially; a day whose summary fails is logged and
/// skipped, so a partially readable month still reports. The persisted row
/// is an upsert keyed by (month, year); re-running with unchanged data
/// rewrites the identical row rather than appending a second one.
pub async fn monthly_report(
    store: &TableStore,
    month: u32,
    year: i32,
) -> Result<MonthlyReport, DaoError> {
    let (first, last) = month_bounds(month, year).ok_or(DaoError::InvalidState(
        "Month and year do not form a valid calendar month",
    ))?;

    let mut details = Vec::with_capacity(31);

    let mut total_km = 0i64;
    let mut total_trips = 0u32;
    let mut total_gross_income = 0.0f64;
    let mut total_bonus = 0.0f64;
    let mut total_expenses = 0.0f64;

    let mut date = first;
    while date <= last {
        match daily_summary(store, date).await {
            Ok(day) => {
                total_km += day.total_km;
                total_trips += day.total_trips;
                // Historical name: accumulates income with bonus included
                total_gross_income += day.total_income;
                total_bonus += day.bonus;
                total_expenses += day.total_expenses;
                details.push(day);
            }
            Err(e) => {
                log::warn!("Skipping {date} in monthly rollup: {e}");
            }
        }

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let net_income = total_gross_income - total_expenses;
    let productivity_per_km = if total_km > 0 {
        net_income / total_km as f64
    } else {
        0.0
    };

    let summary = MonthlySummary {
        anchor_date: first,
        month: first.month(),
        year: first.year(),
        total_km,
        total_trips,
        total_gross_income: round2(total_gross_income),
        total_bonus: round2(total_bonus),
        total_expenses: round2(total_expenses),
        net_income: round2(net_income),
        productivity_per_km: round2(productivity_per_km),
    };

    db::monthly::Dao::new(store).upsert(&summary).await?;

    Ok(MonthlyReport { summary, details })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::memory_store;
    use crate::models::trip::NewTrip;

    async fn seed_trips(store: &TableStore, day: u32, count: u32) {
        let dao = db::trips::Dao::new(store);

        for n in 0..count {
            dao.create(&NewTrip {
                date: NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
                start_time: format!("{:02}:00", 6 + n),
                end_time: format!("{:02}:30", 6 + n),
                fare: 10.0,
                tip: 0.0,
                airport: false,
            })
            .await
            .unwrap();
        }
    }

    #[test]
    fn month_bounds_handle_the_year_boundary() {
        let (first, last) = month_bounds(12, 2025).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

        let (first, last) = month_bounds(2, 2024).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        assert!(month_bounds(13, 2025).is_none());
    }

    #[tokio::test]
    async fn rollup_sums_days_and_persists() {
        let store = memory_store();

        seed_trips(&store, 3, 2).await;
        seed_trips(&store, 4, 3).await;

        let report = monthly_report(&store, 11, 2025).await.unwrap();

        assert_eq!(report.summary.total_trips, 5);
        assert_eq!(report.summary.total_gross_income, 50.0);
        assert_eq!(report.summary.net_income, 50.0);
        assert_eq!(report.details.len(), 30);

        let persisted = db::monthly::Dao::new(&store)
            .get(11, 2025)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(persisted, report.summary);
    }

    #[tokio::test]
    async fn rerunning_a_report_upserts_a_single_identical_row() {
        let store = memory_store();
        seed_trips(&store, 10, 4).await;

        let first = monthly_report(&store, 11, 2025).await.unwrap();
        let second = monthly_report(&store, 11, 2025).await.unwrap();

        assert_eq!(first.summary, second.summary);
        assert_eq!(db::monthly::Dao::new(&store).row_count().await.unwrap(), 1);
    }
}
