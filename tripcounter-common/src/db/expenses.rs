use chrono::NaiveDate;

use crate::gateway::TableSpec;
use crate::models::expense::{self, ExpenseRecord};

use super::{DaoError, TableStore};

static TABLE: TableSpec = TableSpec {
    key: expense::TABLE_KEY,
    headers: expense::HEADERS,
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

    pub async fn expenses_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ExpenseRecord>, DaoError> {
        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        let mut expenses = Vec::new();

        for row in &rows {
            match ExpenseRecord::from_row(row) {
                Ok(expense) if expense.date == date => expenses.push(expense),
                Ok(_) => (),
                Err(e) => log::warn!("Skipping unparseable expense row: {e}"),
            }
        }

        Ok(expenses)
    }

    /// Appends unconditionally; duplicate expenses are permitted.
    pub async fn create(&self, expense: &ExpenseRecord) -> Result<(), DaoError> {
        let table = self.store.open(&TABLE).await?;

        self.store
            .gateway()
            .append_row(&table, &expense.to_row())
            .await?;

        Ok(())
    }
}
