use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{
    data_index, normalize_values, row_from_values, GatewayError, Row, TableGateway, TableHandle,
    TableSpec,
};

#[derive(Serialize, Deserialize)]
struct TableDocument {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Durable single-node table store: one JSON document per table under a data
/// directory. Stands in for the remote spreadsheet service behind the same
/// trait.
pub struct FileGateway {
    dir: PathBuf,
    // All document IO is serialized; tables are small and read whole
    io_lock: Mutex<()>,
}

impl FileGateway {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, GatewayError> {
        let dir = dir.into();

        std::fs::create_dir_all(&dir).map_err(|e| {
            GatewayError::OpenFailure(format!(
                "Failed to create data directory '{}': {e}",
                dir.display()
            ))
        })?;

        Ok(Self {
            dir,
            io_lock: Mutex::new(()),
        })
    }

    fn table_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn load(&self, spec: &TableSpec) -> Result<TableDocument, GatewayError> {
        let bytes = tokio::fs::read(self.table_path(spec.key))
            .await
            .map_err(|e| {
                GatewayError::Backend(format!("Failed to read table '{}': {e}", spec.key))
            })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            GatewayError::Backend(format!("Table '{}' is not valid JSON: {e}", spec.key))
        })
    }

    async fn save(&self, spec: &TableSpec, document: &TableDocument) -> Result<(), GatewayError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|e| {
            GatewayError::Backend(format!("Failed to serialize table '{}': {e}", spec.key))
        })?;

        tokio::fs::write(self.table_path(spec.key), bytes)
            .await
            .map_err(|e| {
                GatewayError::Backend(format!("Failed to write table '{}': {e}", spec.key))
            })
    }
}

#[async_trait]
impl TableGateway for FileGateway {
    async fn ensure_table(&self, spec: &'static TableSpec) -> Result<TableHandle, GatewayError> {
        let _guard = self.io_lock.lock().await;

        if Path::exists(&self.table_path(spec.key)) {
            let document = self.load(spec).await?;

            if document.headers != spec.headers {
                return Err(GatewayError::HeaderMismatch {
                    table: spec.key,
                    expected: spec.headers.iter().map(|h| String::from(*h)).collect(),
                    found: document.headers,
                });
            }
        } else {
            let document = TableDocument {
                headers: spec.headers.iter().map(|h| String::from(*h)).collect(),
                rows: Vec::new(),
            };

            self.save(spec, &document).await?;
        }

        Ok(TableHandle { spec })
    }

    async fn read_all_rows(&self, table: &TableHandle) -> Result<Vec<Row>, GatewayError> {
        let _guard = self.io_lock.lock().await;
        let document = self.load(table.spec).await?;

        Ok(document
            .rows
            .iter()
            .map(|values| row_from_values(table.spec, values))
            .collect())
    }

    async fn append_row(&self, table: &TableHandle, values: &[String]) -> Result<(), GatewayError> {
        let _guard = self.io_lock.lock().await;
        let mut document = self.load(table.spec).await?;

        document.rows.push(normalize_values(table.spec, values));

        self.save(table.spec, &document).await
    }

    async fn update_cell(
        &self,
        table: &TableHandle,
        row_index: usize,
        column_index: usize,
        value: &str,
    ) -> Result<(), GatewayError> {
        let _guard = self.io_lock.lock().await;
        let mut document = self.load(table.spec).await?;

        let row = data_index(row_index)
            .and_then(|i| document.rows.get_mut(i))
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

        self.save(table.spec, &document).await
    }

    async fn update_row(
        &self,
        table: &TableHandle,
        row_index: usize,
        values: &[String],
    ) -> Result<(), GatewayError> {
        let _guard = self.io_lock.lock().await;
        let mut document = self.load(table.spec).await?;

        let row = data_index(row_index)
            .and_then(|i| document.rows.get_mut(i))
            .ok_or(GatewayError::RowOutOfBounds {
                table: table.spec.key,
                row_index,
            })?;

        *row = normalize_values(table.spec, values);

        self.save(table.spec, &document).await
    }
}
