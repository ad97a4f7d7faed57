pub mod inventory;
pub mod journal;

pub use inventory::{apply_movement, StockLedger, StockUpdate};
pub use journal::Journal;
