//! Order Model
//!
//! Orders are created atomically by the order coordinator and are immutable
//! afterwards. Line items are value snapshots: later SKU price or attribute
//! edits do not alter historical orders.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use surrealdb::RecordId;

pub type OrderId = RecordId;

/// Order status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

/// One line item within an order (value snapshot at time of sale)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(with = "serde_helpers::record_id")]
    pub sku: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub sku_code: String,
    pub quantity: i64,
    /// Unit price at time of sale
    pub unit_price: f64,
    /// quantity × unit_price, rounded to 2 decimals
    pub line_total: f64,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Optional customer info captured on the order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A completed sale transaction
///
/// Invariants: `sub_total = Σ line_total`, `total = sub_total + tax`,
/// `total_items = Σ quantity`. All money fields are rounded to 2 decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// "ORD-<UTC timestamp, 14 digits>-<8-char random suffix>"
    pub order_number: String,
    pub items: Vec<OrderLine>,
    pub sub_total: f64,
    pub tax: f64,
    pub total: f64,
    pub total_items: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Unix millis
    pub created_at: i64,
}

/// One requested line item in a create-order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub sku_id: String,
    pub quantity: i64,
}

/// Create order payload
///
/// `tax` (explicit amount) wins over `tax_rate`; both default to zero tax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}
