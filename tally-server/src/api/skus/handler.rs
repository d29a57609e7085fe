//! SKU API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::repo_err;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Sku, SkuCreate, SkuUpdate, StockHistory};
use crate::db::repository::{ProductRepository, RepoError, SkuRepository, StockHistoryRepository};
use crate::stock::{StockAdjustment, StockEngine};
use shared::{AppError, AppResult, ErrorCode};

/// Refine repository errors with SKU-specific codes
pub(crate) fn sku_repo_err(e: RepoError) -> AppError {
    match e {
        RepoError::Duplicate(m) if m.contains("Barcode") => {
            AppError::with_message(ErrorCode::BarcodeExists, m)
        }
        RepoError::Duplicate(m) => AppError::with_message(ErrorCode::SkuCodeExists, m),
        RepoError::Database(m) if m.contains("Barcode generation exhausted") => {
            AppError::with_message(ErrorCode::BarcodeExhausted, m)
        }
        other => repo_err(other),
    }
}

/// GET /api/skus - 获取所有 SKU
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Sku>>> {
    let repo = SkuRepository::new(state.db.clone());
    let skus = repo.find_all().await.map_err(repo_err)?;
    Ok(Json(skus))
}

/// GET /api/skus/:id - 获取单个 SKU
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Sku>> {
    let repo = SkuRepository::new(state.db.clone());
    let sku = repo
        .find_by_id(&id)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::sku_not_found(&id))?;
    Ok(Json(sku))
}

/// POST /api/skus - 创建 SKU
///
/// 初始库存通过库存引擎入账 (台账 reason 为 "initial")。
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(data): Json<SkuCreate>,
) -> AppResult<Json<Sku>> {
    let product_repo = ProductRepository::new(state.db.clone());
    let product = product_repo
        .find_by_id(&data.product)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::product_not_found(&data.product))?;
    let product_id = product
        .id
        .ok_or_else(|| AppError::internal("Product record has no id"))?;

    let repo = SkuRepository::new(state.db.clone());
    let sku = repo
        .create(
            product_id,
            data.code,
            data.barcode,
            data.attributes,
            data.price,
            data.reorder_threshold,
        )
        .await
        .map_err(sku_repo_err)?;

    let initial_stock = data.initial_stock.unwrap_or(0);
    if initial_stock < 0 {
        return Err(AppError::validation(format!(
            "Invalid initial stock: {}",
            initial_stock
        )));
    }
    if initial_stock > 0 {
        let sku_id = sku
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| AppError::internal("Created SKU has no id"))?;
        let engine = StockEngine::new(state.db.clone());
        let (sku, _) = engine
            .adjust(StockAdjustment {
                sku_id,
                delta: initial_stock,
                reason: "initial".to_string(),
                actor: Some(user.id),
                order_ref: None,
                metadata: None,
            })
            .await?;
        return Ok(Json(sku));
    }

    Ok(Json(sku))
}

/// PUT /api/skus/:id - 更新 SKU 目录字段
///
/// `stock` 不可通过此接口修改，库存只走调整引擎。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<Json<Sku>> {
    if payload.get("stock").is_some() {
        return Err(AppError::with_message(
            ErrorCode::StockImmutable,
            "Stock cannot be edited directly; use a stock adjustment",
        ));
    }
    let data: SkuUpdate = serde_json::from_value(payload)
        .map_err(|e| AppError::validation(format!("Invalid SKU update: {}", e)))?;

    let repo = SkuRepository::new(state.db.clone());
    let sku = repo.update(&id, data).await.map_err(sku_repo_err)?;
    Ok(Json(sku))
}

/// DELETE /api/skus/:id - 删除 SKU
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = SkuRepository::new(state.db.clone());
    repo.delete(&id).await.map_err(repo_err)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    50
}

/// GET /api/skus/:id/history - 调整台账 (最新在前)
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<StockHistory>>> {
    let sku_repo = SkuRepository::new(state.db.clone());
    sku_repo
        .find_by_id(&id)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::sku_not_found(&id))?;

    let repo = StockHistoryRepository::new(state.db.clone());
    let limit = query.limit.clamp(1, 500);
    let entries = repo.find_by_sku(&id, limit).await.map_err(repo_err)?;
    Ok(Json(entries))
}

/// Manual stock correction payload
///
/// `delta` arrives as JSON number; fractional values are rejected rather
/// than truncated.
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub delta: f64,
    pub reason: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Result of one applied adjustment
#[derive(Debug, serde::Serialize)]
pub struct AdjustResponse {
    pub sku: Sku,
    pub history: StockHistory,
}

pub(crate) fn coerce_delta(delta: f64) -> AppResult<i64> {
    if !delta.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::InvalidAdjustment,
            format!("Invalid delta: {}", delta),
        ));
    }
    if delta.fract() != 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAdjustment,
            format!("Delta must be a whole number, got {}", delta),
        ));
    }
    if delta == 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAdjustment,
            "Delta cannot be zero",
        ));
    }
    Ok(delta as i64)
}

/// POST /api/skus/:id/adjust - 手动库存修正 (管理员)
pub async fn adjust(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AdjustRequest>,
) -> AppResult<Json<AdjustResponse>> {
    let delta = coerce_delta(req.delta)?;

    let engine = StockEngine::new(state.db.clone());
    let (sku, history) = engine
        .adjust(StockAdjustment {
            sku_id: id,
            delta,
            reason: req.reason,
            actor: Some(user.id),
            order_ref: None,
            metadata: req.metadata,
        })
        .await?;

    Ok(Json(AdjustResponse { sku, history }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_delta() {
        assert_eq!(coerce_delta(5.0).unwrap(), 5);
        assert_eq!(coerce_delta(-3.0).unwrap(), -3);
        assert!(coerce_delta(0.0).is_err());
        assert!(coerce_delta(1.5).is_err());
        assert!(coerce_delta(f64::NAN).is_err());
        assert!(coerce_delta(f64::INFINITY).is_err());
    }
}
