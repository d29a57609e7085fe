//! Tally Server - 零售库存与订单管理后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (商品、SKU、台账、订单)
//! - **库存引擎** (`stock`): 唯一的库存写入路径，带追加式台账
//! - **订单协调器** (`orders`): 原子化多商品下单
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! tally-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色授权
//! ├── api/           # HTTP 路由和处理器
//! ├── stock/         # 库存调整引擎、低库存查询
//! ├── orders/        # 订单事务协调器
//! ├── db/            # 数据库层 (模型、仓储、schema)
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod stock;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderCoordinator;
pub use stock::{StockAdjustment, StockEngine};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(Some(&log_level), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ______      ____
 /_  __/___ _/ / /_  __
  / / / __ `/ / / / / /
 / / / /_/ / / / /_/ /
/_/  \__,_/_/_/\__, /
              /____/
    "#
    );
}
