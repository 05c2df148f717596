// ==========================================
// ONE Tracker 质检分析引擎 - 配置错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置模块错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置 JSON 解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置值超出范围 (key: {key}, value: {value}): 期望 {expected}")]
    OutOfRange {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("未知区域设置: {0}")]
    UnknownLocale(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
