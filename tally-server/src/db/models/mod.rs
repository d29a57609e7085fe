//! Database Models
//!
//! 数据模型定义，与 SurrealDB schema 对应

mod order;
mod product;
mod serde_helpers;
mod settings;
mod sku;
mod stock_history;
mod user;

pub use order::{
    CustomerInfo, Order, OrderCreate, OrderId, OrderItemInput, OrderLine, OrderStatus,
};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate, ProductWithStock};
pub use settings::{Settings, SettingsUpdate};
pub use sku::{Sku, SkuCreate, SkuId, SkuSeed, SkuUpdate, coerce_attributes};
pub use stock_history::StockHistory;
pub use user::{User, UserCreate, UserId, UserRole};
