use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cells::Row;

pub const DEFAULT_ERROR_MESSAGE: &str = "No error message";
pub const DEFAULT_USER_ID: &str = "anonymous";

/// One row of the Logs table. Append-only, diagnostics only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: String,
    pub action: String,
    pub error_message: String,
    pub data: String,
    pub user_agent: String,
    pub user_id: String,
}

impl LogEntry {
    pub fn to_row(&self) -> Row {
        vec![
            json!(self.timestamp),
            json!(self.action),
            json!(self.error_message),
            json!(self.data),
            json!(self.user_agent),
            json!(self.user_id),
        ]
    }
}
