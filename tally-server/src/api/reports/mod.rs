//! Reports API 模块 (管理员)

mod handler;

use axum::middleware as axum_middleware;
use axum::{Router, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", report_routes())
}

fn report_routes() -> Router<ServerState> {
    Router::new()
        .route("/summary", get(handler::summary))
        .route("/top-selling", get(handler::top_selling))
        .route("/daily-trend", get(handler::daily_trend))
        .route("/category-breakdown", get(handler::category_breakdown))
        .route_layer(axum_middleware::from_fn(require_admin))
}
