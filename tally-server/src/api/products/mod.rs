//! Product API 模块

mod handler;

use axum::middleware as axum_middleware;
use axum::{Router, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    // Reads are open to staff, mutations are admin only
    let admin = Router::new()
        .route(
            "/",
            axum::routing::post(handler::create),
        )
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/skus", get(handler::list_skus))
        .merge(admin)
}
