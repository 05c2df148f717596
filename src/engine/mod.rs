// ==========================================
// ONE Tracker 质检分析引擎 - 引擎层
// ==========================================
// 数据流:
// 原始行 → SKU 解析 → 指标聚合 → {集中度, 复发} → 洞察规则 → 角色视图
// ==========================================
// 红线: 引擎为纯函数批处理，不持有可变共享状态
// 红线: 阈值显式传参，不读取全局配置
// ==========================================

pub mod aggregator;
pub mod concentration;
pub mod insight;
pub mod on_time;
pub mod period;
pub mod recurrence;
pub mod role_view;
pub mod sku_resolver;
pub mod trend;

// 重导出核心引擎
pub use aggregator::{GroupBy, GroupKey, MetricAggregator, RankBy, RankOptions};
pub use concentration::ConcentrationAnalyzer;
pub use insight::{rules_for, InsightContext, InsightEngine, InsightRule, RuleSeverity, RULES};
pub use on_time::OnTimeAnalyzer;
pub use period::{AnalysisPeriod, PeriodPreset};
pub use recurrence::RecurrenceAnalyzer;
pub use role_view::RoleViewComposer;
pub use sku_resolver::SkuResolver;
pub use trend::TrendAnalyzer;
