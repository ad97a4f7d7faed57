//! Fixed table names and column positions of the workbook.

pub const PRODUCTS: &str = "Products";
pub const TRANSACTIONS: &str = "Transactions";
pub const LOGS: &str = "Logs";

pub const PRODUCT_HEADER: [&str; 6] = [
    "Product_ID",
    "Product_Name",
    "Current_Stock",
    "Category",
    "Location",
    "Last_Updated",
];

pub const TRANSACTION_HEADER: [&str; 9] = [
    "Timestamp",
    "Product_ID",
    "Product_Name",
    "Type",
    "Quantity",
    "User",
    "Issued_To",
    "Notes",
    "Location",
];

pub const LOG_HEADER: [&str; 6] = [
    "Timestamp",
    "Action",
    "Error_Message",
    "Data",
    "User_Agent",
    "User_ID",
];

/// Column positions in the Products table.
pub mod product_col {
    pub const ID: usize = 0;
    pub const NAME: usize = 1;
    pub const CURRENT_STOCK: usize = 2;
    pub const CATEGORY: usize = 3;
    pub const LOCATION: usize = 4;
    pub const LAST_UPDATED: usize = 5;
}

/// Every table with its header, in provisioning order.
pub fn layout() -> [(&'static str, &'static [&'static str]); 3] {
    [
        (PRODUCTS, &PRODUCT_HEADER),
        (TRANSACTIONS, &TRANSACTION_HEADER),
        (LOGS, &LOG_HEADER),
    ]
}
