//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::repo_err;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, StockHistory};
use crate::db::repository::{OrderRepository, StockHistoryRepository};
use crate::orders::OrderCoordinator;
use shared::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

fn default_list_limit() -> i64 {
    50
}

/// POST /api/orders - 创建订单 (原子扣减库存)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(data): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let coordinator = OrderCoordinator::new(state.db.clone());
    let order = coordinator.create_order(data, Some(user.id)).await?;
    Ok(Json(order))
}

/// GET /api/orders - 订单列表 (最新在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let limit = query.limit.clamp(1, 500);
    let orders = repo.find_all(limit).await.map_err(repo_err)?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(order))
}

/// GET /api/orders/:id/ledger - 该订单写入的台账记录
pub async fn ledger(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<StockHistory>>> {
    let order_repo = OrderRepository::new(state.db.clone());
    order_repo
        .find_by_id(&id)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    let repo = StockHistoryRepository::new(state.db.clone());
    let entries = repo.find_by_order(&id).await.map_err(repo_err)?;
    Ok(Json(entries))
}
