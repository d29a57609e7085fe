//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::repo_err;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate, ProductWithStock, Sku};
use crate::db::repository::{ProductRepository, SkuRepository};
use crate::stock::{StockAdjustment, StockEngine};
use shared::{AppError, AppResult};

/// GET /api/products - 获取所有商品 (含聚合库存)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductWithStock>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().await.map_err(repo_err)?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductWithStock>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_with_stock(&id)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::product_not_found(&id))?;
    Ok(Json(product))
}

/// GET /api/products/:id/skus - 商品的所有 SKU 变体
pub async fn list_skus(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Sku>>> {
    let product_repo = ProductRepository::new(state.db.clone());
    product_repo
        .find_by_id(&id)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::product_not_found(&id))?;

    let sku_repo = SkuRepository::new(state.db.clone());
    let skus = sku_repo.find_by_product(&id).await.map_err(repo_err)?;
    Ok(Json(skus))
}

/// POST /api/products - 创建商品
///
/// 可级联创建 SKU 变体；初始库存通过库存引擎入账，
/// 因而每个带初始库存的变体都会留下一条 "initial" 台账记录。
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(data): Json<ProductCreate>,
) -> AppResult<Json<ProductWithStock>> {
    let product_repo = ProductRepository::new(state.db.clone());
    let sku_repo = SkuRepository::new(state.db.clone());
    let engine = StockEngine::new(state.db.clone());

    let product = product_repo
        .create(data.name, data.description, data.category)
        .await
        .map_err(repo_err)?;
    let product_id = product
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Created product has no id"))?;

    for seed in data.skus {
        let sku = sku_repo
            .create(
                product_id.clone(),
                seed.code,
                seed.barcode,
                seed.attributes,
                seed.price,
                seed.reorder_threshold,
            )
            .await
            .map_err(crate::api::skus::sku_repo_err)?;

        let initial_stock = seed.initial_stock.unwrap_or(0);
        if initial_stock < 0 {
            return Err(AppError::validation(format!(
                "Invalid initial stock: {}",
                initial_stock
            )));
        }
        if initial_stock > 0 {
            let sku_id = sku
                .id
                .ok_or_else(|| AppError::internal("Created SKU has no id"))?;
            engine
                .adjust(StockAdjustment {
                    sku_id: sku_id.to_string(),
                    delta: initial_stock,
                    reason: "initial".to_string(),
                    actor: Some(user.id.clone()),
                    order_ref: None,
                    metadata: None,
                })
                .await?;
        }
    }

    let created = product_repo
        .find_with_stock(&product_id.to_string())
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::internal("Created product could not be read back"))?;
    Ok(Json(created))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, data).await.map_err(repo_err)?;
    Ok(Json(product))
}

/// DELETE /api/products/:id - 删除商品 (仍有 SKU 时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.db.clone());
    repo.delete(&id).await.map_err(repo_err)?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
