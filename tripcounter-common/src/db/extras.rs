use chrono::NaiveDate;

use crate::gateway::TableSpec;
use crate::models::extra::{self, ExtraRecord, NewExtra};

use super::{sequencing, DaoError, TableStore};

static TABLE: TableSpec = TableSpec {
    key: extra::TABLE_KEY,
    headers: extra::HEADERS,
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

    pub async fn extras_for_date(&self, date: NaiveDate) -> Result<Vec<ExtraRecord>, DaoError> {
        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        let mut extras = Vec::new();

        for row in &rows {
            match ExtraRecord::from_row(row) {
                Ok(extra) if extra.date == date => extras.push(extra),
                Ok(_) => (),
                Err(e) => log::warn!("Skipping unparseable extra row: {e}"),
            }
        }

        Ok(extras)
    }

    /// Same duplicate and sequencing rules as trips, against the extras
    /// table's own independent sequence.
    pub async fn create(&self, new_extra: &NewExtra) -> Result<ExtraRecord, DaoError> {
        let _guard = self.store.lock(&TABLE).await;

        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        if sequencing::is_duplicate(
            &rows,
            new_extra.date,
            &new_extra.start_time,
            &new_extra.end_time,
        ) {
            return Err(DaoError::Duplicate(
                "An extra with the same date, start time, and end time already exists",
            ));
        }

        let number = sequencing::next_number(&rows, new_extra.date);
        let extra = ExtraRecord::build(new_extra, number);

        self.store
            .gateway()
            .append_row(&table, &extra.to_row())
            .await?;

        Ok(extra)
    }
}
