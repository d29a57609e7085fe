//! SKU API 模块

mod handler;

pub(crate) use handler::{coerce_delta, sku_repo_err};

use axum::middleware as axum_middleware;
use axum::{Router, routing::get, routing::post, routing::put};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/skus", sku_routes())
}

fn sku_routes() -> Router<ServerState> {
    // Reads are open to staff, mutations and corrections are admin only
    let admin = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/adjust", post(handler::adjust))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/history", get(handler::history))
        .merge(admin)
}
