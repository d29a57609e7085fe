//! Stock History Model
//!
//! Append-only ledger of every stock change. Entries are created inside the
//! same unit of work as the SKU mutation they record and are never updated
//! or deleted.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One immutable stock-change record
///
/// Invariant: `new_stock = previous_stock + change`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockHistory {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub sku: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    /// Signed change amount (negative for deductions)
    pub change: i64,
    pub previous_stock: i64,
    pub new_stock: i64,
    /// Free-text cause, e.g. "order:ORD-…", "initial", "manual correction"
    pub reason: String,
    /// Originating order, when the change came from a sale
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub order: Option<RecordId>,
    /// Actor (user) id for audit attribution
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Unix millis
    pub created_at: i64,
}
