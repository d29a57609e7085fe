//! Stock API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::api::repo_err;
use crate::api::skus::coerce_delta;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Sku, StockHistory};
use crate::db::repository::SettingsRepository;
use crate::stock::{LowStockAlert, StockAdjustment, StockEngine, find_low_stock};
use shared::AppResult;

/// One item of a bulk adjustment request
#[derive(Debug, Deserialize)]
pub struct BulkAdjustItem {
    pub sku_id: String,
    pub delta: f64,
    pub reason: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct BulkAdjustRequest {
    pub adjustments: Vec<BulkAdjustItem>,
}

#[derive(Debug, serde::Serialize)]
pub struct BulkAdjustResponse {
    pub results: Vec<BulkAdjustResult>,
}

#[derive(Debug, serde::Serialize)]
pub struct BulkAdjustResult {
    pub sku: Sku,
    pub history: StockHistory,
}

/// POST /api/stock/bulk-adjust - 批量调整 (管理员)
///
/// 全部成功或全部回滚。
pub async fn bulk_adjust(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<BulkAdjustRequest>,
) -> AppResult<Json<BulkAdjustResponse>> {
    let mut adjustments = Vec::with_capacity(req.adjustments.len());
    for item in req.adjustments {
        adjustments.push(StockAdjustment {
            sku_id: item.sku_id,
            delta: coerce_delta(item.delta)?,
            reason: item.reason,
            actor: Some(user.id.clone()),
            order_ref: None,
            metadata: item.metadata,
        });
    }

    let engine = StockEngine::new(state.db.clone());
    let results = engine.adjust_bulk(adjustments).await?;

    Ok(Json(BulkAdjustResponse {
        results: results
            .into_iter()
            .map(|(sku, history)| BulkAdjustResult { sku, history })
            .collect(),
    }))
}

/// GET /api/stock/low - 低库存告警
///
/// 无自有阈值的 SKU 回落到门店默认阈值。
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<LowStockAlert>>> {
    let settings = SettingsRepository::new(state.db.clone())
        .get()
        .await
        .map_err(repo_err)?;

    let alerts = find_low_stock(&state.db, settings.default_reorder_threshold).await?;
    Ok(Json(alerts))
}
