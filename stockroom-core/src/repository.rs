use async_trait::async_trait;
use stockroom_shared::{Cell, Row};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    TableMissing(String),
    #[error("Row {row} is out of range for table {table}")]
    RowOutOfRange { table: String, row: usize },
    #[error("Workbook I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Workbook serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository over a sheet-like workbook of named tables.
///
/// Every table starts with a header row. Row indices handed out and accepted
/// here are positions among the *data* rows (the header is never addressed).
/// Each call is individually consistent; nothing groups several calls, so a
/// read followed by a write may race with another writer.
#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Creates `table` with `header` when it does not exist yet.
    /// Returns `true` when the table was created.
    async fn ensure_table(&self, table: &str, header: &[&str]) -> StoreResult<bool>;

    /// Linear scan from the first data row; the first row whose column 0
    /// reads as `key` wins.
    async fn find_by_key(&self, table: &str, key: &str) -> StoreResult<Option<(usize, Row)>>;

    /// Appends `row` after the last data row and returns its index.
    async fn append(&self, table: &str, row: Row) -> StoreResult<usize>;

    /// Overwrites the given `(column, value)` cells of one data row.
    async fn update_fields(
        &self,
        table: &str,
        row_index: usize,
        fields: &[(usize, Cell)],
    ) -> StoreResult<()>;

    /// All data rows in storage order.
    async fn rows(&self, table: &str) -> StoreResult<Vec<Row>>;
}
