use std::sync::Arc;

use stockroom_catalog::{Journal, StockLedger};
use stockroom_core::TableRepository;
use stockroom_store::app_config::DefaultsConfig;

#[derive(Clone)]
pub struct AppState {
    pub ledger: StockLedger,
    pub journal: Journal,
    pub defaults: DefaultsConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn TableRepository>, defaults: DefaultsConfig) -> Self {
        Self {
            ledger: StockLedger::new(store.clone()),
            journal: Journal::new(store),
            defaults,
        }
    }
}
