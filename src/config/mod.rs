// ==========================================
// ONE Tracker 质检分析引擎 - 配置层
// ==========================================
// 职责: 阈值 / SKU 目录 / 检验员名册，以值的形式显式传递
// 存储: JSON 配置档（可选）
// ==========================================

pub mod analysis_profile;
pub mod error;
pub mod inspector_roster;
pub mod sku_catalog;
pub mod thresholds;

// 重导出核心配置
pub use analysis_profile::AnalysisProfile;
pub use error::{ConfigError, ConfigResult};
pub use inspector_roster::InspectorRoster;
pub use sku_catalog::{SkuCatalog, DEFAULT_COLOR_CODES, DEFAULT_EXCEPTIONS};
pub use thresholds::ThresholdConfig;
