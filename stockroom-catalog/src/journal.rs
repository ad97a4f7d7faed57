use std::sync::Arc;

use stockroom_core::{CoreResult, TableRepository};
use stockroom_shared::{tables, LogEntry};
use tracing::error;

/// Appends diagnostics to the Logs table.
#[derive(Clone)]
pub struct Journal {
    store: Arc<dyn TableRepository>,
}

impl Journal {
    pub fn new(store: Arc<dyn TableRepository>) -> Self {
        Self { store }
    }

    pub async fn append(&self, entry: &LogEntry) -> CoreResult<()> {
        self.store.append(tables::LOGS, entry.to_row()).await?;
        Ok(())
    }

    /// Best effort: a failed append is reported through tracing only.
    pub async fn record(&self, entry: LogEntry) {
        if let Err(e) = self.append(&entry).await {
            error!("Failed to log error for {}: {}", entry.action, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stockroom_store::MemoryWorkbook;

    fn entry() -> LogEntry {
        LogEntry {
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            action: "getProduct".to_string(),
            error_message: "boom".to_string(),
            data: String::new(),
            user_agent: String::new(),
            user_id: "anonymous".to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_swallows_missing_table() {
        let wb = Arc::new(MemoryWorkbook::new());
        let journal = Journal::new(wb.clone());

        journal.record(entry()).await;
        assert!(journal.append(&entry()).await.is_err());
    }

    #[tokio::test]
    async fn test_append_writes_log_row() {
        let wb = Arc::new(MemoryWorkbook::new());
        wb.ensure_table(tables::LOGS, &tables::LOG_HEADER).await.unwrap();
        let journal = Journal::new(wb.clone());

        journal.append(&entry()).await.unwrap();

        let rows = wb.rows(tables::LOGS).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], json!("getProduct"));
        assert_eq!(rows[0][5], json!("anonymous"));
    }
}
