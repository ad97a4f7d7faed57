use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::actions::{add_transaction, RequestContext};
use crate::request::NewTransaction;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub local_id: Value,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncSummary {
    pub processed: usize,
    pub results: Vec<SyncResult>,
}

/// Replays queued client transactions one after another, in order.
/// A failing item is reported in its result and never stops the batch.
pub async fn sync_batch(state: &AppState, items: Vec<Value>, ctx: &RequestContext) -> SyncSummary {
    let total = items.len();
    let mut results = Vec::with_capacity(total);

    for item in items {
        let local_id = item.get("localId").cloned().unwrap_or(Value::Null);

        let outcome = match NewTransaction::from_payload(item) {
            Ok(tx) => add_transaction(state, tx, ctx).await,
            Err(e) => Err(e),
        };

        results.push(match outcome {
            Ok(data) => SyncResult {
                local_id,
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => {
                warn!("Batch item {} failed: {}", local_id, e);
                SyncResult {
                    local_id,
                    success: false,
                    data: None,
                    error: Some(e.to_string()),
                }
            }
        });
    }

    let failed = results.iter().filter(|r| !r.success).count();
    info!("Synced batch of {} transactions ({} failed)", total, failed);

    SyncSummary {
        processed: results.len(),
        results,
    }
}
