//! Stock History Repository
//!
//! Read-only access to the adjustment ledger. Entries are written exclusively
//! by the stock engine inside its transactions and are never mutated here.

use super::{BaseRepository, RepoResult, parse_id};
use crate::db::models::StockHistory;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct StockHistoryRepository {
    base: BaseRepository,
}

impl StockHistoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Ledger entries for one SKU, newest first
    pub async fn find_by_sku(&self, sku_id: &str, limit: i64) -> RepoResult<Vec<StockHistory>> {
        let thing = parse_id("sku", sku_id)?;
        let entries: Vec<StockHistory> = self
            .base
            .db()
            .query(
                "SELECT * FROM stock_history WHERE sku = $sku ORDER BY created_at DESC LIMIT $limit",
            )
            .bind(("sku", thing))
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// Ledger entries written for one order, in write order
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<StockHistory>> {
        let thing = parse_id("order", order_id)?;
        let entries: Vec<StockHistory> = self
            .base
            .db()
            .query("SELECT * FROM stock_history WHERE order = $order ORDER BY created_at")
            .bind(("order", thing))
            .await?
            .take(0)?;
        Ok(entries)
    }
}
