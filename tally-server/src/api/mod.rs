//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`auth`] - 认证相关接口
//! - [`products`] - 商品管理接口
//! - [`skus`] - SKU 管理接口
//! - [`stock`] - 库存调整接口
//! - [`orders`] - 订单接口
//! - [`reports`] - 销售报表接口 (管理员)
//! - [`settings`] - 门店设置接口 (管理员)

pub mod auth;
pub mod health;
pub mod middleware;
pub mod orders;
pub mod products;
pub mod reports;
pub mod settings;
pub mod skus;
pub mod stock;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::repository::RepoError;
use shared::{AppError, ErrorCode};

/// Map repository errors to API errors. Resource-specific codes (duplicate
/// SKU code, barcode exhaustion) are refined in the individual handlers.
pub(crate) fn repo_err(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(m) => AppError::with_message(ErrorCode::NotFound, m),
        RepoError::Duplicate(m) => AppError::with_message(ErrorCode::AlreadyExists, m),
        RepoError::Validation(m) => AppError::validation(m),
        RepoError::Database(m) => AppError::database(m),
    }
}

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
        .merge(skus::router())
        .merge(stock::router())
        .merge(orders::router())
        .merge(reports::router())
        .merge(settings::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Request logging - outermost, executed first
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - executes before routes, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state)
}
