pub mod cells;
pub mod clock;
pub mod models;
pub mod tables;

pub use cells::{Cell, Row};
pub use models::{LogEntry, Product, Transaction, TransactionType};
