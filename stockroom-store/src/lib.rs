pub mod app_config;
pub mod json_workbook;
pub mod memory;
pub mod provision;

use std::sync::Arc;

use stockroom_core::{StoreResult, TableRepository};

pub use json_workbook::JsonWorkbook;
pub use memory::{MemoryWorkbook, Table};
pub use provision::{provision, ProvisionReport};

use app_config::{StoreBackend, StoreConfig};

/// Opens the workbook backend selected by configuration.
pub async fn open_workbook(config: &StoreConfig) -> StoreResult<Arc<dyn TableRepository>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory workbook");
            Ok(Arc::new(MemoryWorkbook::new()))
        }
        StoreBackend::Json => {
            tracing::info!("Using JSON workbook at {}", config.path.display());
            Ok(Arc::new(JsonWorkbook::open(&config.path).await?))
        }
    }
}
