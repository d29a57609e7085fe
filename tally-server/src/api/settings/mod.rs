//! Settings API 模块 (管理员)

mod handler;

use axum::middleware as axum_middleware;
use axum::{Router, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/settings",
        Router::new()
            .route("/", get(handler::get).put(handler::update))
            .route_layer(axum_middleware::from_fn(require_admin)),
    )
}
