use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use stockroom_core::{StoreResult, TableRepository};
use stockroom_shared::{Cell, Row};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::memory::{MemoryWorkbook, Table};

/// Workbook persisted as a single JSON document.
///
/// Reads are served from memory; every mutation rewrites the whole file
/// (temp file, then rename). Mutations are serialized by `write_lock`.
pub struct JsonWorkbook {
    path: PathBuf,
    inner: MemoryWorkbook,
    write_lock: Mutex<()>,
}

impl JsonWorkbook {
    /// Loads `path`, or starts empty when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let tables: BTreeMap<String, Table> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Workbook {} not found, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            inner: MemoryWorkbook::from_tables(tables),
            write_lock: Mutex::new(()),
        })
    }

    /// Copy of the current tables to mutate before `commit`.
    async fn stage(&self) -> MemoryWorkbook {
        MemoryWorkbook::from_tables(self.inner.snapshot().await)
    }

    /// Writes `staged` to disk and only then makes it the live state, so a
    /// failed write leaves memory and file in agreement.
    async fn commit(&self, staged: MemoryWorkbook) -> StoreResult<()> {
        let tables = staged.into_tables();
        let bytes = serde_json::to_vec_pretty(&tables)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        self.inner.replace(tables).await;
        debug!("Persisted workbook to {} ({} bytes)", self.path.display(), bytes.len());
        Ok(())
    }
}

#[async_trait]
impl TableRepository for JsonWorkbook {
    async fn ensure_table(&self, table: &str, header: &[&str]) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage().await;
        let created = staged.ensure_table(table, header).await?;
        if created {
            self.commit(staged).await?;
        }
        Ok(created)
    }

    async fn find_by_key(&self, table: &str, key: &str) -> StoreResult<Option<(usize, Row)>> {
        self.inner.find_by_key(table, key).await
    }

    async fn append(&self, table: &str, row: Row) -> StoreResult<usize> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage().await;
        let index = staged.append(table, row).await?;
        self.commit(staged).await?;
        Ok(index)
    }

    async fn update_fields(
        &self,
        table: &str,
        row_index: usize,
        fields: &[(usize, Cell)],
    ) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let staged = self.stage().await;
        staged.update_fields(table, row_index, fields).await?;
        self.commit(staged).await
    }

    async fn rows(&self, table: &str) -> StoreResult<Vec<Row>> {
        self.inner.rows(table).await
    }
}
