//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`BusinessCalendar`] - 业务时区日期计算
//! - 日志初始化

pub mod logger;
pub mod time;

// Re-export error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode, FieldError};
pub use time::BusinessCalendar;
