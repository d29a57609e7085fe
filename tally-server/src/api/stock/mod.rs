//! Stock API 模块

mod handler;

use axum::middleware as axum_middleware;
use axum::{Router, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stock", stock_routes())
}

fn stock_routes() -> Router<ServerState> {
    let admin = Router::new()
        .route("/bulk-adjust", post(handler::bulk_adjust))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new().route("/low", get(handler::low_stock)).merge(admin)
}
