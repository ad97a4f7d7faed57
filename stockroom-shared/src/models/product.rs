use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cells::{cell_at, cell_int, cell_text, Cell, Row};
use crate::tables::product_col;

/// One row of the Products table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub current_stock: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    pub last_updated: String,
}

impl Product {
    /// Reads a Products row. Short rows and blank cells are tolerated; the
    /// stock cell is read with leading-integer rules.
    pub fn from_row(row: &[Cell]) -> Self {
        Self {
            id: cell_text(cell_at(row, product_col::ID)),
            name: cell_text(cell_at(row, product_col::NAME)),
            current_stock: cell_int(cell_at(row, product_col::CURRENT_STOCK)),
            category: cell_text(cell_at(row, product_col::CATEGORY)),
            location: cell_text(cell_at(row, product_col::LOCATION)),
            last_updated: cell_text(cell_at(row, product_col::LAST_UPDATED)),
        }
    }

    pub fn to_row(&self) -> Row {
        vec![
            json!(self.id),
            json!(self.name),
            json!(self.current_stock),
            json!(self.category),
            json!(self.location),
            json!(self.last_updated),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_product_from_sparse_row() {
        let row = vec![json!("USB-002"), json!("USB Cable"), json!("n/a")];
        let product = Product::from_row(&row);

        assert_eq!(product.id, "USB-002");
        assert_eq!(product.current_stock, 0);
        assert_eq!(product.category, "");
        assert_eq!(product.last_updated, "");
    }

    #[test]
    fn test_product_row_keeps_column_order() {
        let product = Product {
            id: "WH-001".to_string(),
            name: "Wireless Headphones".to_string(),
            current_stock: 25,
            category: "Electronics".to_string(),
            location: "A1-B2".to_string(),
            last_updated: "2024-01-01T00:00:00.000Z".to_string(),
        };

        let row = product.to_row();
        assert_eq!(row[0], json!("WH-001"));
        assert_eq!(row[2], json!(25));
        assert_eq!(row[4], json!("A1-B2"));
        assert_eq!(Product::from_row(&row), product);
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product::from_row(&[json!("PC-003"), json!("Phone Case"), json!(75)]);
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["currentStock"], json!(75));
        assert!(value.get("lastUpdated").is_some());
        assert_eq!(value.get("current_stock"), None::<&Value>);
    }
}
