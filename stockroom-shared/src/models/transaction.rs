use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::json;

use crate::cells::Row;

pub const DEFAULT_USER: &str = "System";

/// Direction of a stock movement. Parsed case-insensitively, stored upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid transaction type: {0} (expected IN or OUT)")]
pub struct UnknownTransactionType(pub String);

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(TransactionType::In),
            "OUT" => Ok(TransactionType::Out),
            _ => Err(UnknownTransactionType(s.to_string())),
        }
    }
}

impl Serialize for TransactionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One row of the Transactions table. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub timestamp: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub quantity: u32,
    pub user: String,
    pub issued_to: String,
    pub notes: String,
    pub location: String,
}

impl Transaction {
    pub fn to_row(&self) -> Row {
        vec![
            json!(self.timestamp),
            json!(self.product_id),
            json!(self.product_name),
            json!(self.transaction_type.as_str()),
            json!(self.quantity),
            json!(self.user),
            json!(self.issued_to),
            json!(self.notes),
            json!(self.location),
        ]
    }
}
