//! Offer Desk - 房产报价谈判核心
//!
//! # 架构概述
//!
//! 纯函数引擎，作用于调用方持有的报价快照：
//!
//! - **校验** (`offers::validator`): 字段规则、状态图、规范化
//! - **筛选/排序** (`offers::filter`, `offers::sort`): 派生列表视图
//! - **统计** (`offers::stats`): 固定结构的汇总计数
//! - **时间线** (`offers::timeline`): 由状态推导的事件列表
//! - **操作** (`offers::actions`): 创建、编辑、状态流转、还价、批量操作
//!
//! # 模块结构
//!
//! ```text
//! offer-desk/src/
//! ├── core/          # 配置
//! ├── offers/        # 报价引擎
//! ├── report.rs      # 快照加载与报表
//! └── utils/         # 日志、业务日历
//! ```

pub mod core;
pub mod offers;
pub mod report;
pub mod utils;

// Re-export 公共类型
pub use crate::core::Config;
pub use offers::{OfferError, OfferFilter, build_view, compute_stats, derive_timeline};
pub use report::{DeskReport, build_report, load_offers, load_query};
pub use utils::{AppError, AppResult, BusinessCalendar, ErrorCategory, ErrorCode, FieldError};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置运行环境: 加载 .env，按配置初始化日志
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}
