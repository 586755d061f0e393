use chrono::NaiveDate;

use crate::gateway::TableSpec;
use crate::models::budget_item::{self, BudgetItem, Reminder, PAID_COLUMN};

use super::{DaoError, TableStore};

static TABLE: TableSpec = TableSpec {
    key: budget_item::TABLE_KEY,
    headers: budget_item::HEADERS,
};

/// A budget item together with the physical row it occupies, so callers can
/// address the positional mark-paid update.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PositionedBudgetItem {
    /// 1-based physical row (header = row 1)
    pub row_index: usize,
    #[serde(flatten)]
    pub item: BudgetItem,
}

pub struct Dao {
    store: TableStore,
}

impl Dao {
    pub fn new(store: &TableStore) -> Self {
        Self {
            store: store.clone(),
        }
    }

    pub async fn items_for_owner(
        &self,
        owner: &str,
    ) -> Result<Vec<PositionedBudgetItem>, DaoError> {
        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        let mut items = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            match BudgetItem::from_row(row) {
                Ok(item) if item.owner == owner => items.push(PositionedBudgetItem {
                    row_index: i + 2,
                    item,
                }),
                Ok(_) => (),
                Err(e) => log::warn!("Skipping unparseable budget row: {e}"),
            }
        }

        Ok(items)
    }

    pub async fn create(&self, item: &BudgetItem) -> Result<(), DaoError> {
        let table = self.store.open(&TABLE).await?;

        self.store
            .gateway()
            .append_row(&table, &item.to_row())
            .await?;

        Ok(())
    }

    /// Flips the `paid` flag for the item at the given physical row. The
    /// flag never flips back.
    pub async fn mark_paid(&self, row_index: usize) -> Result<(), DaoError> {
        let table = self.store.open(&TABLE).await?;

        self.store
            .gateway()
            .update_cell(&table, row_index, PAID_COLUMN, "true")
            .await?;

        Ok(())
    }

    pub async fn reminders(&self, owner: &str, today: NaiveDate) -> Result<Vec<Reminder>, DaoError> {
        let items = self.items_for_owner(owner).await?;

        Ok(items
            .iter()
            .filter_map(|positioned| positioned.item.reminder(today))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::memory_store;
    use crate::models::budget_item::ReminderKind;
    use chrono::Duration;

    fn item(owner: &str, category: &str, due_date: Option<NaiveDate>) -> BudgetItem {
        BudgetItem {
            owner: String::from(owner),
            category: String::from(category),
            amount: 120.0,
            due_date,
            paid: false,
        }
    }

    #[tokio::test]
    async fn mark_paid_flips_the_flag_in_place() {
        let store = memory_store();
        let dao = Dao::new(&store);

        dao.create(&item("driver@example.com", "rent", None))
            .await
            .unwrap();
        dao.create(&item("driver@example.com", "phone", None))
            .await
            .unwrap();

        let items = dao.items_for_owner("driver@example.com").await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(!items[1].item.paid);

        dao.mark_paid(items[1].row_index).await.unwrap();

        let items = dao.items_for_owner("driver@example.com").await.unwrap();
        assert!(!items[0].item.paid);
        assert!(items[1].item.paid);
    }

    #[tokio::test]
    async fn items_are_partitioned_by_owner() {
        let store = memory_store();
        let dao = Dao::new(&store);

        dao.create(&item("a@example.com", "rent", None)).await.unwrap();
        dao.create(&item("b@example.com", "rent", None)).await.unwrap();

        let items = dao.items_for_owner("a@example.com").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item.owner, "a@example.com");
    }

    #[tokio::test]
    async fn reminders_cover_due_and_three_day_windows() {
        let store = memory_store();
        let dao = Dao::new(&store);
        let today = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();

        dao.create(&item("d@example.com", "rent", Some(today)))
            .await
            .unwrap();
        dao.create(&item("d@example.com", "phone", Some(today + Duration::days(3))))
            .await
            .unwrap();
        dao.create(&item("d@example.com", "gym", Some(today + Duration::days(5))))
            .await
            .unwrap();

        let reminders = dao.reminders("d@example.com", today).await.unwrap();

        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].kind, ReminderKind::Due);
        assert_eq!(reminders[1].kind, ReminderKind::ThreeDays);
    }
}
