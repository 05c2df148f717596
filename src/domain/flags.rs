// ==========================================
// ONE Tracker 质检分析引擎 - 分析标记
// ==========================================
// 集中度标记 / 复发标记 / 月度问题快照
// ==========================================

use crate::domain::types::MonthKey;
use serde::Serialize;

/// 检验员-父 SKU 工作量集中标记
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationFlag {
    pub parent_sku: String,
    pub inspector: String,
    /// 件数占比（0~1）
    pub share_of_volume: f64,
    pub inspector_units: u64,
    pub sku_units: u64,
    pub inspector_orders: u64,
    pub total_orders_for_sku: u64,
}

impl ConcentrationFlag {
    pub fn share_pct(&self) -> f64 {
        self.share_of_volume * 100.0
    }
}

/// 单月问题 SKU 排名（按报废数降序，长度 <= top_n）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyProblemSnapshot {
    pub month: MonthKey,
    pub top_problem_skus: Vec<String>,
}

/// 复发问题 SKU
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurrenceFlag {
    pub parent_sku: String,
    pub occurrences: usize,
    /// 上榜月份（时间顺序）
    pub months: Vec<MonthKey>,
}

/// 复发分析结果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecurrenceReport {
    /// 窗口内有快照的月份（时间顺序）
    pub window: Vec<MonthKey>,
    /// 窗口覆盖的日历月数（历史不足时从最早快照月算起）
    pub span_months: usize,
    /// 最早快照晚于窗口起点
    pub insufficient_history: bool,
    pub flags: Vec<RecurrenceFlag>,
}
