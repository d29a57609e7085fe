//! Report API Handlers
//!
//! 只读报表：按日期范围聚合已完成订单。

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::api::repo_err;
use crate::core::ServerState;
use crate::db::repository::ReportsRepository;
use crate::db::repository::reports::{CategoryRow, DailyTrendRow, SalesSummary, TopSellingRow};
use shared::AppResult;

/// Date range query: inclusive YYYY-MM-DD bounds (UTC)
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: String,
    pub to: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// GET /api/reports/summary
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<SalesSummary>> {
    let repo = ReportsRepository::new(state.db.clone());
    let summary = repo
        .summary(&query.from, &query.to)
        .await
        .map_err(repo_err)?;
    Ok(Json(summary))
}

/// GET /api/reports/top-selling
pub async fn top_selling(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<TopSellingRow>>> {
    let repo = ReportsRepository::new(state.db.clone());
    let limit = query.limit.clamp(1, 100);
    let rows = repo
        .top_selling(&query.from, &query.to, limit)
        .await
        .map_err(repo_err)?;
    Ok(Json(rows))
}

/// GET /api/reports/daily-trend
pub async fn daily_trend(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<DailyTrendRow>>> {
    let repo = ReportsRepository::new(state.db.clone());
    let rows = repo
        .daily_trend(&query.from, &query.to)
        .await
        .map_err(repo_err)?;
    Ok(Json(rows))
}

/// GET /api/reports/category-breakdown
pub async fn category_breakdown(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<CategoryRow>>> {
    let repo = ReportsRepository::new(state.db.clone());
    let rows = repo
        .category_breakdown(&query.from, &query.to)
        .await
        .map_err(repo_err)?;
    Ok(Json(rows))
}
