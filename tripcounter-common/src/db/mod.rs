use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::gateway::{open_table, GatewayError, RetryPolicy, TableGateway, TableHandle, TableSpec};

pub mod bonus_ledger;
pub mod budget;
pub mod expenses;
pub mod extras;
pub mod monthly;
pub mod odometer;
pub mod sequencing;
pub mod trips;

/// Shared handle to the table gateway plus one mutex per table.
///
/// Every read-modify-write sequence (duplicate check + sequencing + append,
/// ledger upsert, odometer start/end) runs under its table's lock. Plain
/// reads take no lock.
#[derive(Clone)]
pub struct TableStore {
    gateway: Arc<dyn TableGateway>,
    locks: Arc<Mutex<HashMap<&'static str, Arc<Mutex<()>>>>>,
    retry: RetryPolicy,
}

impl TableStore {
    pub fn new(gateway: Arc<dyn TableGateway>) -> Self {
        Self {
            gateway,
            locks: Arc::new(Mutex::new(HashMap::new())),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn gateway(&self) -> &dyn TableGateway {
        &*self.gateway
    }

    /// Opens a table, retrying transient failures per the store's policy.
    pub async fn open(&self, spec: &'static TableSpec) -> Result<TableHandle, GatewayError> {
        open_table(&*self.gateway, spec, self.retry).await
    }

    /// Acquires the mutation lock for a table. Held for the whole
    /// read-modify-write sequence, never across unrelated tables.
    pub async fn lock(&self, spec: &TableSpec) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(spec.key).or_default())
        };

        lock.lock_owned().await
    }
}

#[derive(Debug)]
pub enum DaoError {
    Gateway(GatewayError),
    Duplicate(&'static str),
    NotFound(&'static str),
    InvalidState(&'static str),
}

impl std::error::Error for DaoError {}

impl fmt::Display for DaoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaoError::Gateway(e) => write!(f, "DaoError: {e}"),
            DaoError::Duplicate(msg) => write!(f, "DaoError: Duplicate: {msg}"),
            DaoError::NotFound(msg) => write!(f, "DaoError: Not found: {msg}"),
            DaoError::InvalidState(msg) => write!(f, "DaoError: Invalid state: {msg}"),
        }
    }
}

impl From<GatewayError> for DaoError {
    fn from(error: GatewayError) -> Self {
        DaoError::Gateway(error)
    }
}
