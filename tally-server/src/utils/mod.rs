//! 工具模块 - 通用工具函数
//!
//! - [`logger`] - 日志初始化
//! - [`money`] - 金额舍入

pub mod logger;
pub mod money;

pub use money::round2;
