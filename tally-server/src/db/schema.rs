//! Schema Definitions
//!
//! Applied idempotently on every start (`IF NOT EXISTS` / `OVERWRITE`-free).
//! Tables stay schemaless; the unique indexes are the hard guarantees.

/// DEFINE statements executed at startup
pub const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS product;
DEFINE TABLE IF NOT EXISTS sku;
DEFINE TABLE IF NOT EXISTS stock_history;
DEFINE TABLE IF NOT EXISTS order;
DEFINE TABLE IF NOT EXISTS settings;
DEFINE TABLE IF NOT EXISTS user;

DEFINE INDEX IF NOT EXISTS idx_sku_code ON TABLE sku COLUMNS code UNIQUE;
DEFINE INDEX IF NOT EXISTS idx_sku_barcode ON TABLE sku COLUMNS barcode UNIQUE;
DEFINE INDEX IF NOT EXISTS idx_sku_product ON TABLE sku COLUMNS product;
DEFINE INDEX IF NOT EXISTS idx_order_number ON TABLE order COLUMNS order_number UNIQUE;
DEFINE INDEX IF NOT EXISTS idx_history_sku ON TABLE stock_history COLUMNS sku;
DEFINE INDEX IF NOT EXISTS idx_history_order ON TABLE stock_history COLUMNS order;
DEFINE INDEX IF NOT EXISTS idx_user_username ON TABLE user COLUMNS username UNIQUE;
"#;
