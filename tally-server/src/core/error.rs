use thiserror::Error;

/// 服务器启动阶段错误
///
/// 请求处理路径使用 [`shared::AppError`]，这里只覆盖启动和运行时基础设施。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 启动路径的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
