pub mod log_entry;
pub mod product;
pub mod transaction;

pub use log_entry::LogEntry;
pub use product::Product;
pub use transaction::{Transaction, TransactionType, UnknownTransactionType};
