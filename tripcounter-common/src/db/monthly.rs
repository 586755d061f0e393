use crate::gateway::TableSpec;
use crate::models::monthly_summary::{self, MonthlySummary};

use super::{DaoError, TableStore};

static TABLE: TableSpec = TableSpec {
    key: monthly_summary::TABLE_KEY,
    headers: monthly_summary::HEADERS,
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

    pub async fn get(&self, month: u32, year: i32) -> Result<Option<MonthlySummary>, DaoError> {
        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        for row in &rows {
            match MonthlySummary::from_row(row) {
                Ok(summary) if summary.month == month && summary.year == year => {
                    return Ok(Some(summary))
                }
                Ok(_) => (),
                Err(e) => log::warn!("Skipping unparseable monthly summary row: {e}"),
            }
        }

        Ok(None)
    }

    /// Upserts keyed by (month, year): the whole row is overwritten in place
    /// when a match exists, appended otherwise. Re-running a report with
    /// unchanged data therefore leaves exactly one identical row.
    pub async fn upsert(&self, summary: &MonthlySummary) -> Result<(), DaoError> {
        let _guard = self.store.lock(&TABLE).await;

        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        let month = summary.month.to_string();
        let year = summary.year.to_string();

        let existing = rows.iter().position(|row| {
            crate::models::cell(row, "month") == month && crate::models::cell(row, "year") == year
        });

        match existing {
            Some(i) => {
                self.store
                    .gateway()
                    .update_row(&table, i + 2, &summary.to_row())
                    .await?
            }
            None => {
                self.store
                    .gateway()
                    .append_row(&table, &summary.to_row())
                    .await?
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub async fn row_count(&self) -> Result<usize, DaoError> {
        let table = self.store.open(&TABLE).await?;
        Ok(self.store.gateway().read_all_rows(&table).await?.len())
    }
}
