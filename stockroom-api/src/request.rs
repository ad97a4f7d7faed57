//! Request model: one variant per action, validated before dispatch.

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;
use stockroom_shared::{Transaction, TransactionType};

use crate::error::AppError;

pub const INVALID_ACTION: &str = "Invalid action";

#[derive(Debug, Clone)]
pub enum ActionRequest {
    GetProduct { product_id: String },
    AddTransaction(NewTransaction),
    /// Declared by clients, never implemented server side.
    UpdateStock,
    /// Raw items; each one is validated on its own while the batch runs.
    SyncBatch { transactions: Vec<Value> },
    LogError(LogRequest),
}

impl ActionRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ActionRequest::GetProduct { .. } => "getProduct",
            ActionRequest::AddTransaction(_) => "addTransaction",
            ActionRequest::UpdateStock => "updateStock",
            ActionRequest::SyncBatch { .. } => "syncBatch",
            ActionRequest::LogError(_) => "logError",
        }
    }

    pub fn parse(body: Value) -> Result<Self, AppError> {
        let action = body
            .get("action")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::ValidationError(INVALID_ACTION.to_string()))?;

        match action.as_str() {
            "getProduct" => {
                let product_id = body
                    .get("productId")
                    .and_then(Value::as_str)
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| AppError::ValidationError("productId is required".to_string()))?;
                Ok(ActionRequest::GetProduct {
                    product_id: product_id.to_string(),
                })
            }
            "addTransaction" => NewTransaction::from_payload(body).map(ActionRequest::AddTransaction),
            "updateStock" => Ok(ActionRequest::UpdateStock),
            "syncBatch" => match body.get("transactions") {
                None | Some(Value::Null) => Ok(ActionRequest::SyncBatch {
                    transactions: Vec::new(),
                }),
                Some(Value::Array(items)) => Ok(ActionRequest::SyncBatch {
                    transactions: items.clone(),
                }),
                Some(_) => Err(AppError::ValidationError(
                    "transactions must be an array".to_string(),
                )),
            },
            "logError" => serde_json::from_value(body)
                .map(ActionRequest::LogError)
                .map_err(|e| AppError::ValidationError(format!("Invalid log request: {}", e))),
            _ => Err(AppError::ValidationError(INVALID_ACTION.to_string())),
        }
    }
}

/// Payload of `addTransaction` and of every `syncBatch` item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub product_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(deserialize_with = "positive_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub issued_to: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl NewTransaction {
    /// Accepts the fields at the top level or nested under `transaction`.
    pub fn from_payload(payload: Value) -> Result<Self, AppError> {
        let payload = match payload {
            Value::Object(mut map) => match map.remove("transaction") {
                Some(nested @ Value::Object(_)) => nested,
                Some(other) => {
                    map.insert("transaction".to_string(), other);
                    Value::Object(map)
                }
                None => Value::Object(map),
            },
            other => other,
        };

        let tx: NewTransaction = serde_json::from_value(payload)
            .map_err(|e| AppError::ValidationError(format!("Invalid transaction: {}", e)))?;

        if tx.product_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Invalid transaction: productId must not be empty".to_string(),
            ));
        }
        Ok(tx)
    }

    /// Builds the stored row; blank optional fields fall back to defaults.
    pub fn into_transaction(self, timestamp: String, default_user: &str) -> Transaction {
        Transaction {
            timestamp,
            product_id: self.product_id,
            product_name: self.product_name,
            transaction_type: self.transaction_type,
            quantity: self.quantity,
            user: non_blank(self.user).unwrap_or_else(|| default_user.to_string()),
            issued_to: non_blank(self.issued_to).unwrap_or_default(),
            notes: non_blank(self.notes).unwrap_or_default(),
            location: non_blank(self.location).unwrap_or_default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn positive_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    let parsed = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f > 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Raw::Text(s) => s.trim().parse::<u64>().ok(),
    };

    match parsed {
        Some(q) if q > 0 => u32::try_from(q)
            .map_err(|_| D::Error::custom("quantity is too large")),
        _ => Err(D::Error::custom("quantity must be a positive integer")),
    }
}

/// Payload of `logError`. `failedAction` names the action being reported;
/// without it the entry is filed under `logError`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    #[serde(default)]
    pub failed_action: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_or_missing_action_is_invalid() {
        for body in [json!({"action": "deleteEverything"}), json!({"productId": "WH-001"}), json!({"action": 7})] {
            let err = ActionRequest::parse(body).unwrap_err();
            assert!(matches!(err, AppError::ValidationError(ref m) if m == INVALID_ACTION));
        }
    }

    #[test]
    fn test_add_transaction_accepts_nested_client_shape() {
        let body = json!({
            "action": "addTransaction",
            "transaction": {
                "id": 1717000000000u64,
                "productId": "WH-001",
                "productName": "Wireless Headphones",
                "type": "out",
                "quantity": 5,
                "issuedTo": "Line 3",
                "user": "QR Scanner User"
            }
        });

        let ActionRequest::AddTransaction(tx) = ActionRequest::parse(body).unwrap() else {
            panic!("expected addTransaction");
        };
        assert_eq!(tx.product_id, "WH-001");
        assert_eq!(tx.transaction_type, TransactionType::Out);
        assert_eq!(tx.issued_to.as_deref(), Some("Line 3"));
    }

    #[test]
    fn test_quantity_must_be_positive_integer() {
        let base = json!({"productId": "WH-001", "productName": "Headphones", "type": "IN"});

        for bad in [json!(0), json!(-3), json!(2.5), json!("many"), json!(true)] {
            let mut payload = base.clone();
            payload["quantity"] = bad;
            assert!(NewTransaction::from_payload(payload).is_err());
        }

        let mut payload = base.clone();
        payload["quantity"] = json!("7");
        assert_eq!(NewTransaction::from_payload(payload).unwrap().quantity, 7);
    }

    #[test]
    fn test_missing_required_field_names_it() {
        let err = NewTransaction::from_payload(json!({"productId": "WH-001", "type": "IN", "quantity": 1}))
            .unwrap_err();
        assert!(err.to_string().contains("productName"));
    }

    #[test]
    fn test_blank_user_falls_back_to_default() {
        let tx = NewTransaction::from_payload(json!({
            "productId": "WH-001",
            "productName": "Headphones",
            "type": "IN",
            "quantity": 2,
            "user": ""
        }))
        .unwrap()
        .into_transaction("2024-01-01T00:00:00.000Z".to_string(), "System");

        assert_eq!(tx.user, "System");
        assert_eq!(tx.issued_to, "");
    }

    #[test]
    fn test_sync_batch_shapes() {
        let empty = ActionRequest::parse(json!({"action": "syncBatch"})).unwrap();
        assert!(matches!(empty, ActionRequest::SyncBatch { ref transactions } if transactions.is_empty()));

        let bad = ActionRequest::parse(json!({"action": "syncBatch", "transactions": {}}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_update_stock_is_recognised() {
        let request = ActionRequest::parse(json!({"action": "updateStock", "productId": "WH-001"})).unwrap();
        assert_eq!(request.name(), "updateStock");
    }
}
