use chrono::NaiveDate;

use crate::gateway::TableSpec;
use crate::models::trip::{self, NewTrip, TripRecord};

use super::{sequencing, DaoError, TableStore};

static TABLE: TableSpec = TableSpec {
    key: trip::TABLE_KEY,
    headers: trip::HEADERS,
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

    pub async fn trips_for_date(&self, date: NaiveDate) -> Result<Vec<TripRecord>, DaoError> {
        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        let mut trips = Vec::new();

        for row in &rows {
            match TripRecord::from_row(row) {
                Ok(trip) if trip.date == date => trips.push(trip),
                Ok(_) => (),
                Err(e) => log::warn!("Skipping unparseable trip row: {e}"),
            }
        }

        Ok(trips)
    }

    /// Rejects an exact (date, start, end) duplicate, assigns the next dense
    /// sequence number for the date, and appends. Runs under the trips-table
    /// lock so concurrent submissions cannot double-assign a number.
    pub async fn create(&self, new_trip: &NewTrip) -> Result<TripRecord, DaoError> {
        let _guard = self.store.lock(&TABLE).await;

        let table = self.store.open(&TABLE).await?;
        let rows = self.store.gateway().read_all_rows(&table).await?;

        if sequencing::is_duplicate(
            &rows,
            new_trip.date,
            &new_trip.start_time,
            &new_trip.end_time,
        ) {
            return Err(DaoError::Duplicate(
                "A trip with the same date, start time, and end time already exists",
            ));
        }

        let number = sequencing::next_number(&rows, new_trip.date);
        let trip = TripRecord::build(new_trip, number);

        self.store
            .gateway()
            .append_row(&table, &trip.to_row())
            .await?;

        Ok(trip)
    }
}
