use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{headers::UserAgent, TypedHeader};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use stockroom_core::identity::transaction_id;
use stockroom_shared::cells::cell_text;
use stockroom_shared::clock::{iso, now_iso};
use stockroom_shared::models::log_entry::{DEFAULT_ERROR_MESSAGE, DEFAULT_USER_ID};
use stockroom_shared::LogEntry;
use stockroom_catalog::StockUpdate;
use tracing::{debug, error, info};

use crate::batch;
use crate::envelope::Envelope;
use crate::error::AppError;
use crate::request::{ActionRequest, LogRequest, NewTransaction};
use crate::state::AppState;

/// Per-request facts that end up in log rows.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_agent: String,
}

impl RequestContext {
    pub fn from_header(user_agent: Option<TypedHeader<UserAgent>>) -> Self {
        Self {
            user_agent: user_agent
                .map(|TypedHeader(ua)| ua.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeQuery {
    pub action: Option<String>,
    pub product_id: Option<String>,
}

// ============================================================================
// HTTP entry points
// ============================================================================

/// POST /
pub async fn handle_post(
    State(state): State<AppState>,
    user_agent: Option<TypedHeader<UserAgent>>,
    body: Bytes,
) -> Response {
    let ctx = RequestContext::from_header(user_agent);

    let value: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            state
                .journal
                .record(failure_entry(&state, "doPost", &e.to_string(), String::new(), &ctx))
                .await;
            return AppError::MalformedBody(e.to_string()).into_response();
        }
    };

    match ActionRequest::parse(value) {
        Ok(request) => respond(dispatch(&state, request, &ctx).await),
        Err(e) => e.into_response(),
    }
}

/// GET /
/// Liveness probe; `?action=getProduct&productId=...` is answered as a lookup.
/// A query string that does not parse still gets the probe body.
pub async fn handle_get(
    State(state): State<AppState>,
    user_agent: Option<TypedHeader<UserAgent>>,
    query: Result<Query<ProbeQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(e) => {
            debug!("Ignoring unparsable query string: {}", e);
            return probe().await.into_response();
        }
    };

    if query.action.as_deref() != Some("getProduct") {
        return probe().await.into_response();
    }

    let ctx = RequestContext::from_header(user_agent);
    match query.product_id.filter(|id| !id.is_empty()) {
        Some(product_id) => respond(get_product(&state, &product_id, &ctx).await),
        None => AppError::ValidationError("productId is required".to_string()).into_response(),
    }
}

/// GET /health
pub async fn probe() -> Json<Value> {
    Json(json!({ "status": "API is running" }))
}

fn respond(result: Result<Value, AppError>) -> Response {
    match result {
        Ok(data) => Envelope::ok(data).into_response(),
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Dispatch
// ============================================================================

pub async fn dispatch(
    state: &AppState,
    request: ActionRequest,
    ctx: &RequestContext,
) -> Result<Value, AppError> {
    debug!("Dispatching {}", request.name());

    match request {
        ActionRequest::GetProduct { product_id } => get_product(state, &product_id, ctx).await,
        ActionRequest::AddTransaction(tx) => add_transaction(state, tx, ctx).await,
        ActionRequest::UpdateStock => {
            let err = AppError::UnsupportedAction("updateStock".to_string());
            state
                .journal
                .record(failure_entry(state, "updateStock", &err.to_string(), String::new(), ctx))
                .await;
            Err(err)
        }
        ActionRequest::SyncBatch { transactions } => {
            let summary = batch::sync_batch(state, transactions, ctx).await;
            serde_json::to_value(summary).map_err(|e| AppError::StoreError(e.to_string()))
        }
        ActionRequest::LogError(req) => log_error(state, req, ctx).await,
    }
}

pub async fn get_product(
    state: &AppState,
    product_id: &str,
    ctx: &RequestContext,
) -> Result<Value, AppError> {
    let product = match state.ledger.lookup(product_id).await {
        Ok(product) => product,
        Err(e @ stockroom_core::CoreError::NotFound(_)) => return Err(e.into()),
        Err(e) => {
            state
                .journal
                .record(failure_entry(
                    state,
                    "getProduct",
                    &e.to_string(),
                    json!({ "productId": product_id }).to_string(),
                    ctx,
                ))
                .await;
            return Err(AppError::from_core(e, "Error fetching product"));
        }
    };

    serde_json::to_value(product).map_err(|e| AppError::StoreError(e.to_string()))
}

/// Appends the transaction row, then moves stock. The two steps are not
/// atomic: a failed or skipped stock update leaves the appended row in
/// place and still reports success.
pub async fn add_transaction(
    state: &AppState,
    tx: NewTransaction,
    ctx: &RequestContext,
) -> Result<Value, AppError> {
    let now = Utc::now();
    let timestamp = iso(now);
    let transaction = tx.into_transaction(timestamp.clone(), &state.defaults.user);

    if let Err(e) = state.ledger.record_transaction(&transaction).await {
        let data = serde_json::to_string(&transaction).unwrap_or_default();
        state
            .journal
            .record(failure_entry(state, "addTransaction", &e.to_string(), data, ctx))
            .await;
        return Err(AppError::from_core(e, "Error adding transaction"));
    }

    match state
        .ledger
        .update_stock(&transaction.product_id, transaction.transaction_type, transaction.quantity)
        .await
    {
        Ok(StockUpdate::Applied { .. }) => {}
        Ok(StockUpdate::Skipped) => {
            info!(
                "Transaction recorded for unknown product {}, stock untouched",
                transaction.product_id
            );
        }
        Err(e) => {
            error!("Stock update failed for {}: {}", transaction.product_id, e);
            let data = json!({
                "productId": transaction.product_id,
                "type": transaction.transaction_type,
                "quantity": transaction.quantity,
            })
            .to_string();
            state
                .journal
                .record(failure_entry(state, "updateProductStock", &e.to_string(), data, ctx))
                .await;
        }
    }

    Ok(json!({
        "transactionId": transaction_id(now),
        "timestamp": timestamp,
        "status": "recorded",
    }))
}

pub async fn log_error(
    state: &AppState,
    req: LogRequest,
    ctx: &RequestContext,
) -> Result<Value, AppError> {
    let entry = LogEntry {
        timestamp: now_iso(),
        action: req
            .failed_action
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "logError".to_string()),
        error_message: req
            .error
            .as_ref()
            .map(cell_text)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        data: req.data.as_ref().map(cell_text).unwrap_or_default(),
        user_agent: req
            .user_agent
            .filter(|ua| !ua.is_empty())
            .unwrap_or_else(|| ctx.user_agent.clone()),
        user_id: req
            .user_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| state.defaults.log_user_id.clone()),
    };

    match state.journal.append(&entry).await {
        Ok(()) => Ok(json!({ "logged": true, "timestamp": entry.timestamp })),
        Err(e) => {
            error!("Failed to log error: {}", e);
            Err(AppError::StoreError("Failed to log error".to_string()))
        }
    }
}

/// Log row for a failure caught inside a handler.
fn failure_entry(
    state: &AppState,
    action: &str,
    message: &str,
    data: String,
    ctx: &RequestContext,
) -> LogEntry {
    LogEntry {
        timestamp: now_iso(),
        action: action.to_string(),
        error_message: if message.is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            message.to_string()
        },
        data,
        user_agent: ctx.user_agent.clone(),
        user_id: if state.defaults.log_user_id.is_empty() {
            DEFAULT_USER_ID.to_string()
        } else {
            state.defaults.log_user_id.clone()
        },
    }
}
