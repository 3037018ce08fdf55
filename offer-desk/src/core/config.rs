use chrono_tz::Tz;

use crate::utils::time::parse_timezone;

/// 桌面配置 - offer desk 的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | OFFERS_FILE | offers.json | 报价快照 (JSON 数组) |
/// | OFFER_QUERY_FILE | - | 列表筛选条件 (JSON 对象) |
/// | BUSINESS_TIMEZONE | Europe/Madrid | 业务时区 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// OFFERS_FILE=/data/offers.json BUSINESS_TIMEZONE=America/Bogota cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 报价快照文件
    pub offers_file: String,
    /// 筛选条件文件 (可选)
    pub query_file: Option<String>,
    /// 业务时区名称 (IANA)
    pub business_timezone: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录 (可选)
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            offers_file: get("OFFERS_FILE").unwrap_or_else(|| "offers.json".into()),
            query_file: get("OFFER_QUERY_FILE"),
            business_timezone: get("BUSINESS_TIMEZONE")
                .unwrap_or_else(|| "Europe/Madrid".into()),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: get("LOG_DIR"),
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        }
    }

    /// 业务时区 (解析失败时回退到默认时区)
    pub fn timezone(&self) -> Tz {
        parse_timezone(&self.business_timezone)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
