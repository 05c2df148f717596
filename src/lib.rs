// ==========================================
// ONE Tracker 质检分析引擎 - 核心库
// ==========================================
// 系统定位: 成衣检验日志 → 质检 KPI + 角色视图 + 自动洞察
// 引擎特性: 纯函数批处理，同样的输入与配置必然得到同样的输出
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 阈值 / SKU 目录 / 检验员名册
pub mod config;

// 导入层 - 外部数据
pub mod importer;

// 引擎层 - 分析规则
pub mod engine;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MonthKey, Rate, Role, Severity};

// 领域实体
pub use domain::{
    ConcentrationFlag, InsightBullet, InspectionDataset, InspectionRow, MetricSummary,
    RecurrenceFlag, RoleViewPayload, RowRejection,
};

// 配置
pub use config::{AnalysisProfile, InspectorRoster, SkuCatalog, ThresholdConfig};

// 导入
pub use importer::{ImportError, InspectionImporter};

// 引擎
pub use engine::{
    AnalysisPeriod, ConcentrationAnalyzer, InsightEngine, MetricAggregator, RecurrenceAnalyzer,
    RoleViewComposer, SkuResolver,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "ONE Tracker QC";
