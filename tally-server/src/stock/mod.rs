//! Stock Module
//!
//! 库存调整引擎：唯一的库存写入路径

mod engine;
mod low_stock;
mod txn;

pub use engine::{StockAdjustment, StockEngine};
pub use low_stock::{LowStockAlert, find_low_stock};
pub use txn::{StockTxn, TxnSlot};
