//! Orders Module
//!
//! 订单事务协调器：原子化创建订单

mod coordinator;
mod number;

pub use coordinator::OrderCoordinator;
pub use number::generate_order_number;
