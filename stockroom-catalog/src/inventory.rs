use std::sync::Arc;

use serde_json::json;
use stockroom_core::{CoreError, CoreResult, TableRepository};
use stockroom_shared::cells::{cell_at, cell_int};
use stockroom_shared::clock::now_iso;
use stockroom_shared::tables::{self, product_col};
use stockroom_shared::{Product, Transaction, TransactionType};
use tracing::{debug, info};

/// Outcome of a stock update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockUpdate {
    Applied { previous: i64, current: i64 },
    /// No Products row carries the id. Not an error.
    Skipped,
}

/// New running total after a movement. Stock is not clamped at zero.
pub fn apply_movement(current: i64, transaction_type: TransactionType, quantity: u32) -> i64 {
    let quantity = i64::from(quantity);
    match transaction_type {
        TransactionType::In => current.saturating_add(quantity),
        TransactionType::Out => current.saturating_sub(quantity),
    }
}

/// Products and Transactions tables, seen as a stock ledger.
///
/// Stock lives as a running total in the Products row and is updated with a
/// plain read-modify-write, so two concurrent movements on one product can
/// lose an update.
#[derive(Clone)]
pub struct StockLedger {
    store: Arc<dyn TableRepository>,
}

impl StockLedger {
    pub fn new(store: Arc<dyn TableRepository>) -> Self {
        Self { store }
    }

    /// Current product record. `last_updated` is the time of this lookup,
    /// not the stored value.
    pub async fn lookup(&self, product_id: &str) -> CoreResult<Product> {
        let (_, row) = self
            .store
            .find_by_key(tables::PRODUCTS, product_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Product not found".to_string()))?;

        let mut product = Product::from_row(&row);
        product.last_updated = now_iso();
        Ok(product)
    }

    pub async fn record_transaction(&self, transaction: &Transaction) -> CoreResult<()> {
        self.store
            .append(tables::TRANSACTIONS, transaction.to_row())
            .await?;
        Ok(())
    }

    pub async fn update_stock(
        &self,
        product_id: &str,
        transaction_type: TransactionType,
        quantity: u32,
    ) -> CoreResult<StockUpdate> {
        let Some((index, row)) = self.store.find_by_key(tables::PRODUCTS, product_id).await? else {
            debug!("No product row for {}, stock left unchanged", product_id);
            return Ok(StockUpdate::Skipped);
        };

        let previous = cell_int(cell_at(&row, product_col::CURRENT_STOCK));
        let current = apply_movement(previous, transaction_type, quantity);

        self.store
            .update_fields(
                tables::PRODUCTS,
                index,
                &[
                    (product_col::CURRENT_STOCK, json!(current)),
                    (product_col::LAST_UPDATED, json!(now_iso())),
                ],
            )
            .await?;

        info!(
            "Stock for {}: {} {} {} -> {}",
            product_id, previous, transaction_type, quantity, current
        );
        Ok(StockUpdate::Applied { previous, current })
    }
}
