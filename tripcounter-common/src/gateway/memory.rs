use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{
    data_index, normalize_values, row_from_values, GatewayError, Row, TableGateway, TableHandle,
    TableSpec,
};

struct MemTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// In-process table store. Backs tests and ephemeral runs; data does not
/// survive a restart.
#[derive(Default)]
pub struct MemoryGateway {
    tables: RwLock<HashMap<&'static str, MemTable>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableGateway for MemoryGateway {
    async fn ensure_table(&self, spec: &'static TableSpec) -> Result<TableHandle, GatewayError> {
        let mut tables = self.tables.write().await;

        match tables.get(spec.key) {
            Some(table) => {
                if table.headers != spec.headers {
                    return Err(GatewayError::HeaderMismatch {
                        table: spec.key,
                        expected: spec.headers.iter().map(|h| String::from(*h)).collect(),
                        found: table.headers.clone(),
                    });
                }
            }
            None => {
                tables.insert(
                    spec.key,
                    MemTable {
                        headers: spec.headers.iter().map(|h| String::from(*h)).collect(),
                        rows: Vec::new(),
                    },
                );
            }
        }

        Ok(TableHandle { spec })
    }

    async fn read_all_rows(&self, table: &TableHandle) -> Result<Vec<Row>, GatewayError> {
        let tables = self.tables.read().await;
        let mem_table = tables
            .get(table.spec.key)
            .ok_or_else(|| GatewayError::Backend(format!("Unknown table '{}'", table.spec.key)))?;

        Ok(mem_table
            .rows
            .iter()
            .map(|values| row_from_values(table.spec, values))
            .collect())
    }

    async fn append_row(&self, table: &TableHandle, values: &[String]) -> Result<(), GatewayError> {
        let mut tables = self.tables.write().await;
        let mem_table = tables
            .get_mut(table.spec.key)
            .ok_or_else(|| GatewayError::Backend(format!("Unknown table '{}'", table.spec.key)))?;

        mem_table.rows.push(normalize_values(table.spec, values));

        Ok(())
    }

    async fn update_cell(
        &self,
        table: &TableHandle,
        row_index: usize,
        column_index: usize,
        value: &str,
    ) -> Result<(), GatewayError> {
        let mut tables = self.tables.write().await;
        let mem_table = tables
            .get_mut(table.spec.key)
            .ok_or_else(|| GatewayError::Backend(format!("Unknown table '{}'", table.spec.key)))?;

        let row = data_index(row_index)
            .and_then(|i| mem_table.rows.get_mut(i))
            .ok_or(GatewayError::RowOutOfBounds {
                table: table.spec.key,
                row_index,
            })?;

        let cell = column_index
            .checked_sub(1)
            .and_then(|i| row.get_mut(i))
            .ok_or(GatewayError::ColumnOutOfBounds {
                table: table.spec.key,
                column_index,
            })?;

        *cell = String::from(value);

        Ok(())
    }

    async fn update_row(
        &self,
        table: &TableHandle,
        row_index: usize,
        values: &[String],
    ) -> Result<(), GatewayError> {
        let mut tables = self.tables.write().await;
        let mem_table = tables
            .get_mut(table.spec.key)
            .ok_or_else(|| GatewayError::Backend(format!("Unknown table '{}'", table.spec.key)))?;

        let row = data_index(row_index)
            .and_then(|i| mem_table.rows.get_mut(i))
            .ok_or(GatewayError::RowOutOfBounds {
                table: table.spec.key,
                row_index,
            })?;

        *row = normalize_values(table.spec, values);

        Ok(())
    }
}
