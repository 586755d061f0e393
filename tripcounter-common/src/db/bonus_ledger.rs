use chrono::NaiveDate;

use crate::gateway::TableSpec;
use crate::models::bonus_ledger::{self, BonusLedgerEntry};

use super::{DaoError, TableStore};

static TABLE: TableSpec = TableSpec {
    key: bonus_ledger::TABLE_KEY,
    headers: bonus_ledger::HEADERS,
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

    /// The cached bonus for a date; 0 when no ledger row exists.
    pub async fn bonus_for_date(&self, date: NaiveDate) -> Result<f64, DaoError> {
        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        for row in &rows {
            match BonusLedgerEntry::from_row(row) {
                Ok(entry) if entry.date == date => return Ok(entry.bonus_total),
                Ok(_) => (),
                Err(e) => log::warn!("Skipping unparseable bonus ledger row: {e}"),
            }
        }

        Ok(0.0)
    }

    /// Upserts the date's ledger row: overwrite in place when one exists,
    /// append otherwise. Runs under the ledger lock so two writers cannot
    /// both append for the same date.
    pub async fn set_for_date(&self, date: NaiveDate, bonus_total: f64) -> Result<(), DaoError> {
        let _guard = self.store.lock(&TABLE).await;

        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        let entry = BonusLedgerEntry { date, bonus_total };
        let date_string = date.to_string();

        let existing = rows
            .iter()
            .position(|row| crate::models::cell(row, "date") == date_string);

        match existing {
            Some(i) => {
                self.store
                    .gateway()
                    .update_row(&table, i + 2, &entry.to_row())
                    .await?
            }
            None => {
                self.store
                    .gateway()
                    .append_row(&table, &entry.to_row())
                    .await?
            }
        }

        Ok(())
    }
}
