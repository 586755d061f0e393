use chrono::NaiveDate;

use crate::gateway::TableSpec;
use crate::models::odometer::{self, OdometerEntry};

use super::{DaoError, TableStore};

static TABLE: TableSpec = TableSpec {
    key: odometer::TABLE_KEY,
    headers: odometer::HEADERS,
};

pub struct Dao {
    store: TableStore,
}

impl Dao {
    pub fn new(store: &TableStore) -> Self {
        Self {
            store: store.clone(),
        }
    }

    /// Returns the (at most one) entry for the date with its physical row.
    pub async fn entry_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<(usize, OdometerEntry)>, DaoError> {
        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        for (i, row) in rows.iter().enumerate() {
            match OdometerEntry::from_row(row) {
                Ok(entry) if entry.date == date => return Ok(Some((i + 2, entry))),
                Ok(_) => (),
                Err(e) => log::warn!("Skipping unparseable odometer row: {e}"),
            }
        }

        Ok(None)
    }

    /// Phase one: records the day's starting reading. Rejected when the day
    /// was already started.
    pub async fn start_day(
        &self,
        date: NaiveDate,
        start_reading: i64,
        notes: String,
    ) -> Result<OdometerEntry, DaoError> {
        let _guard = self.store.lock(&TABLE).await;

        if self.entry_for_date(date).await?.is_some() {
            return Err(DaoError::Duplicate(
                "An odometer entry for this date already exists",
            ));
        }

        let entry = OdometerEntry::started(date, start_reading, notes);
        let table = self.store.open(&TABLE).await?;

        self.store
            .gateway()
            .append_row(&table, &entry.to_row())
            .await?;

        Ok(entry)
    }

    /// Phase two: writes the ending reading and distance onto the day's
    /// existing row. Requires a started day and `end >= start`.
    pub async fn end_day(
        &self,
        date: NaiveDate,
        end_reading: i64,
    ) -> Result<OdometerEntry, DaoError> {
        let _guard = self.store.lock(&TABLE).await;

        let (row_index, mut entry) = self
            .entry_for_date(date)
            .await?
            .ok_or(DaoError::NotFound("No odometer start exists for this date"))?;

        if end_reading < entry.start_reading {
            return Err(DaoError::InvalidState(
                "Ending reading is less than the starting reading",
            ));
        }

        entry.end_reading = Some(end_reading);
        entry.distance = Some(end_reading - entry.start_reading);

        let table = self.store.open(&TABLE).await?;

        self.store
            .gateway()
            .update_row(&table, row_index, &entry.to_row())
            .await?;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::memory_store;

    fn nov3() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let store = memory_store();
        let dao = Dao::new(&store);

        dao.start_day(nov3(), 1000, String::new()).await.unwrap();

        let result = dao.end_day(nov3(), 950).await;
        assert!(matches!(result, Err(DaoError::InvalidState(_))));

        // The stored row is untouched
        let (_, entry) = dao.entry_for_date(nov3()).await.unwrap().unwrap();
        assert_eq!(entry.end_reading, None);
    }

    #[tokio::test]
    async fn ending_the_day_computes_the_distance() {
        let store = memory_store();
        let dao = Dao::new(&store);

        dao.start_day(nov3(), 1000, String::from("city shift"))
            .await
            .unwrap();
        let entry = dao.end_day(nov3(), 1120).await.unwrap();

        assert_eq!(entry.distance, Some(120));

        let (_, stored) = dao.entry_for_date(nov3()).await.unwrap().unwrap();
        assert_eq!(stored.end_reading, Some(1120));
        assert_eq!(stored.distance, Some(120));
        assert_eq!(stored.notes, "city shift");
    }

    #[tokio::test]
    async fn a_day_may_only_start_once() {
        let store = memory_store();
        let dao = Dao::new(&store);

        dao.start_day(nov3(), 1000, String::new()).await.unwrap();

        let result = dao.start_day(nov3(), 1005, String::new()).await;
        assert!(matches!(result, Err(DaoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn ending_an_unstarted_day_is_rejected() {
        let store = memory_store();
        let dao = Dao::new(&store);

        let result = dao.end_day(nov3(), 1120).await;
        assert!(matches!(result, Err(DaoError::NotFound(_))));
    }
}
