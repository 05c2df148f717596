// ==========================================
// ONE Tracker 质检分析引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含文件读取逻辑,不含引擎逻辑
// ==========================================

pub mod flags;
pub mod inspection;
pub mod insight;
pub mod metrics;
pub mod types;
pub mod view;

// 重导出核心类型
pub use flags::{ConcentrationFlag, MonthlyProblemSnapshot, RecurrenceFlag, RecurrenceReport};
pub use inspection::{
    InspectionDataset, InspectionRow, RawInspectionRecord, RejectionKind, RowRejection,
};
pub use insight::InsightBullet;
pub use metrics::{MetricSummary, MonthlyTrendPoint, OnTimeSummary, PeriodComparison};
pub use types::{MonthKey, Rate, Role, Severity};
pub use view::{CardValue, Cell, DataQualitySummary, MetricCard, RoleViewPayload, ViewTable};
