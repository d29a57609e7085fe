//! Stock Adjustment Engine
//!
//! The single write path for `sku.stock` and `stock_history`. Every
//! adjustment updates the SKU and appends exactly one ledger entry in the
//! same transaction, so the ledger always replays to the current stock.

use shared::{AppError, AppResult};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::txn::StockTxn;
use crate::db::models::{Sku, StockHistory};

/// One requested stock mutation
#[derive(Debug, Clone)]
pub struct StockAdjustment {
    pub sku_id: String,
    /// Signed change; negative deducts. Zero is rejected.
    pub delta: i64,
    pub reason: String,
    pub actor: Option<String>,
    pub order_ref: Option<RecordId>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct StockEngine {
    db: Surreal<Db>,
}

impl StockEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Apply one adjustment in its own transaction
    pub async fn adjust(&self, adjustment: StockAdjustment) -> AppResult<(Sku, StockHistory)> {
        let mut results = self.adjust_bulk(vec![adjustment]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::internal("Adjustment produced no result"))
    }

    /// Apply a batch of adjustments in one transaction.
    ///
    /// All-or-nothing: any invalid item, missing SKU, or would-be negative
    /// stock aborts the entire batch with the triggering error.
    pub async fn adjust_bulk(
        &self,
        adjustments: Vec<StockAdjustment>,
    ) -> AppResult<Vec<(Sku, StockHistory)>> {
        if adjustments.is_empty() {
            return Err(AppError::validation("No adjustments supplied"));
        }

        let mut txn = StockTxn::new();
        let mut slots = Vec::with_capacity(adjustments.len());
        for adjustment in &adjustments {
            validate(adjustment)?;
            slots.push(txn.push_adjustment(adjustment)?);
        }

        txn.execute(&self.db).await?;

        let mut results = Vec::with_capacity(slots.len());
        for slot in slots {
            let sku: Option<Sku> = self
                .db
                .select(slot.sku_id.clone())
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            let history: Option<StockHistory> = self
                .db
                .select(slot.history_id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            match (sku, history) {
                (Some(s), Some(h)) => results.push((s, h)),
                _ => {
                    return Err(AppError::internal(format!(
                        "Committed adjustment for {} could not be read back",
                        slot.sku_id
                    )));
                }
            }
        }

        tracing::debug!(count = results.len(), "Stock adjustments committed");
        Ok(results)
    }
}

fn validate(adjustment: &StockAdjustment) -> AppResult<()> {
    if adjustment.delta == 0 {
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidAdjustment,
            "Adjustment delta cannot be zero",
        ));
    }
    if adjustment.reason.trim().is_empty() {
        return Err(AppError::with_message(
            shared::ErrorCode::EmptyReason,
            "Adjustment reason is required",
        ));
    }
    Ok(())
}
