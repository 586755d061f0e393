use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

pub mod file;
pub mod memory;

pub use file::FileGateway;
pub use memory::MemoryGateway;

/// A row as the gateway hands it back: column name to raw cell text. Typed
/// parsing happens at the model boundary, never here.
pub type Row = HashMap<String, String>;

/// Static description of a table: a stable key (used for addressing in every
/// backend) and the exact header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub key: &'static str,
    pub headers: &'static [&'static str],
}

/// Handle returned by `ensure_table`. Carries the spec so row maps can be
/// built without re-reading the header row on every call.
#[derive(Debug, Clone, Copy)]
pub struct TableHandle {
    pub spec: &'static TableSpec,
}

/// Abstract two-dimensional row store with a header row.
///
/// Row indices are 1-based with the header occupying row 1, so data row `i`
/// (0-based, as returned by `read_all_rows`) lives at physical row `i + 2`.
#[async_trait]
pub trait TableGateway: Send + Sync {
    /// Opens the named table, creating it with the spec's header row if it
    /// does not exist. An existing table whose header row does not match the
    /// spec column-for-column is a fatal configuration error.
    async fn ensure_table(&self, spec: &'static TableSpec) -> Result<TableHandle, GatewayError>;

    async fn read_all_rows(&self, table: &TableHandle) -> Result<Vec<Row>, GatewayError>;

    async fn append_row(&self, table: &TableHandle, values: &[String]) -> Result<(), GatewayError>;

    async fn update_cell(
        &self,
        table: &TableHandle,
        row_index: usize,
        column_index: usize,
        value: &str,
    ) -> Result<(), GatewayError>;

    async fn update_row(
        &self,
        table: &TableHandle,
        row_index: usize,
        values: &[String],
    ) -> Result<(), GatewayError>;
}

/// Retry policy for `open_table`. This is the one retry policy in the
/// system; row-level operations are never retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

/// Opens a table with bounded exponential backoff. Header mismatches are
/// configuration errors and surface immediately; only transient open
/// failures are retried.
pub async fn open_table(
    gateway: &dyn TableGateway,
    spec: &'static TableSpec,
    retry: RetryPolicy,
) -> Result<TableHandle, GatewayError> {
    let mut backoff = retry.initial_backoff;
    let mut attempt = 1;

    loop {
        match gateway.ensure_table(spec).await {
            Ok(handle) => return Ok(handle),
            Err(e @ GatewayError::HeaderMismatch { .. }) => return Err(e),
            Err(e) => {
                if attempt >= retry.max_attempts {
                    return Err(e);
                }

                log::warn!(
                    "Failed to open table '{}' (attempt {attempt}): {e}. Retrying...",
                    spec.key
                );

                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
        }
    }
}

#[derive(Debug)]
pub enum GatewayError {
    OpenFailure(String),
    HeaderMismatch {
        table: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },
    RowOutOfBounds {
        table: &'static str,
        row_index: usize,
    },
    ColumnOutOfBounds {
        table: &'static str,
        column_index: usize,
    },
    Backend(String),
}

impl std::error::Error for GatewayError {}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::OpenFailure(e) => {
                write!(f, "GatewayError: Failed to open table: {e}")
            }
            GatewayError::HeaderMismatch {
                table,
                expected,
                found,
            } => {
                write!(
                    f,
                    "GatewayError: Header row of table '{table}' does not match the expected \
                     schema (expected {expected:?}, found {found:?})"
                )
            }
            GatewayError::RowOutOfBounds { table, row_index } => {
                write!(
                    f,
                    "GatewayError: Row {row_index} is out of bounds for table '{table}'"
                )
            }
            GatewayError::ColumnOutOfBounds {
                table,
                column_index,
            } => {
                write!(
                    f,
                    "GatewayError: Column {column_index} is out of bounds for table '{table}'"
                )
            }
            GatewayError::Backend(e) => {
                write!(f, "GatewayError: Backend failure: {e}")
            }
        }
    }
}

pub(crate) fn row_from_values(spec: &TableSpec, values: &[String]) -> Row {
    spec.headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let value = values.get(i).cloned().unwrap_or_default();
            (String::from(*header), value)
        })
        .collect()
}

/// Pads or truncates `values` to the table's column count.
pub(crate) fn normalize_values(spec: &TableSpec, values: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(spec.headers.len());

    for i in 0..spec.headers.len() {
        normalized.push(values.get(i).cloned().unwrap_or_default());
    }

    normalized
}

/// Maps a 1-based physical row index (header = row 1) to the 0-based data
/// row index, or `None` if the index points at the header or below it.
pub(crate) fn data_index(row_index: usize) -> Option<usize> {
    row_index.checked_sub(2)
}
