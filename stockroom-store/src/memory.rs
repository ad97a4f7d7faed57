use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stockroom_core::{StoreError, StoreResult, TableRepository};
use stockroom_shared::cells::{cell_at, cell_text};
use stockroom_shared::{Cell, Row};
use tokio::sync::RwLock;

/// A named table: one header row followed by data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

/// Workbook held entirely in memory.
///
/// The lock is held for the duration of a single repository call only.
pub struct MemoryWorkbook {
    tables: RwLock<BTreeMap<String, Table>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::from_tables(BTreeMap::new())
    }

    pub fn from_tables(tables: BTreeMap<String, Table>) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Copy of every table, for persistence and inspection.
    pub async fn snapshot(&self) -> BTreeMap<String, Table> {
        self.tables.read().await.clone()
    }

    pub fn into_tables(self) -> BTreeMap<String, Table> {
        self.tables.into_inner()
    }

    /// Swaps in a whole new set of tables.
    pub async fn replace(&self, tables: BTreeMap<String, Table>) {
        *self.tables.write().await = tables;
    }
}

impl Default for MemoryWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableRepository for MemoryWorkbook {
    async fn ensure_table(&self, table: &str, header: &[&str]) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(table) {
            return Ok(false);
        }
        tables.insert(
            table.to_string(),
            Table {
                header: header.iter().map(|h| h.to_string()).collect(),
                rows: Vec::new(),
            },
        );
        Ok(true)
    }

    async fn find_by_key(&self, table: &str, key: &str) -> StoreResult<Option<(usize, Row)>> {
        let tables = self.tables.read().await;
        let t = tables
            .get(table)
            .ok_or_else(|| StoreError::TableMissing(table.to_string()))?;

        Ok(t.rows
            .iter()
            .enumerate()
            .find(|(_, row)| cell_text(cell_at(row, 0)) == key)
            .map(|(index, row)| (index, row.clone())))
    }

    async fn append(&self, table: &str, row: Row) -> StoreResult<usize> {
        let mut tables = self.tables.write().await;
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableMissing(table.to_string()))?;

        t.rows.push(row);
        Ok(t.rows.len() - 1)
    }

    async fn update_fields(
        &self,
        table: &str,
        row_index: usize,
        fields: &[(usize, Cell)],
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableMissing(table.to_string()))?;
        let row = t.rows.get_mut(row_index).ok_or_else(|| StoreError::RowOutOfRange {
            table: table.to_string(),
            row: row_index,
        })?;

        for (column, value) in fields {
            if row.len() <= *column {
                row.resize(column + 1, Value::Null);
            }
            row[*column] = value.clone();
        }
        Ok(())
    }

    async fn rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .map(|t| t.rows.clone())
            .ok_or_else(|| StoreError::TableMissing(table.to_string()))
    }
}
