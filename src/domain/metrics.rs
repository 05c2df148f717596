// ==========================================
// ONE Tracker 质检分析引擎 - 指标汇总模型
// ==========================================
// 口径: 所有比率按件数加权（先求和再相除），不得对行级百分比取平均
// 生命周期: 每次查询新建，不落库，计算后不可变
// ==========================================

use crate::domain::types::{MonthKey, Rate};
use serde::Serialize;

// ==========================================
// MetricSummary - 分组指标汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MetricSummary {
    // 件数汇总
    pub inspected: u64,
    pub repairs_total: u64,
    pub scrap_total: u64,
    pub final_qty_total: u64,
    pub qc_fail_total: u64,
    pub sew_fail_total: u64,

    // 订单与标记
    pub orders_count: u64,
    pub red_flag_count: u64,
    pub ncr_count: u64,

    // 交期口径（仅统计有交期的行）
    pub units_with_due_date: u64,
    pub units_on_time: u64,

    // 派生比率（%）
    pub pass_rate: Rate,
    pub fail_rate: Rate,
    pub repair_rate: Rate,
    pub scrap_rate: Rate,
    pub touch_rate: Rate,
    pub on_time_rate: Rate,
    pub pct_caught_at_sewing: Rate,
    pub pct_caught_at_qc: Rate,
}

impl MetricSummary {
    /// 触碰件数 = 返修 + 报废
    pub fn touch_units(&self) -> u64 {
        self.repairs_total + self.scrap_total
    }

    /// |缝制拦截 + 质检拦截 - 报废|
    pub fn capture_divergence(&self) -> u64 {
        (self.sew_fail_total + self.qc_fail_total).abs_diff(self.scrap_total)
    }

    /// 拦截数与报废数的偏差是否在容差内
    ///
    /// 两者只是近似相等，超出容差仅作为数据质量信号
    pub fn capture_within_tolerance(&self, tolerance_pct: f64) -> bool {
        let divergence = self.capture_divergence();
        if divergence == 0 {
            return true;
        }
        if self.scrap_total == 0 {
            return false;
        }
        (divergence as f64 / self.scrap_total as f64 * 100.0) <= tolerance_pct
    }
}

// ==========================================
// OnTimeSummary - 交期达成（订单口径）
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OnTimeSummary {
    /// 有交期的订单数
    pub orders_evaluated: u64,
    pub late_orders: u64,
    pub total_days_late: i64,
    /// 平均延期天数（仅延期订单；无延期为 None）
    pub avg_days_late: Option<f64>,
    /// 无交期被排除的订单数
    pub orders_missing_due_date: u64,
    /// 件数加权按期率
    pub on_time_rate: Rate,
}

// ==========================================
// 月度趋势
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrendPoint {
    pub month: MonthKey,
    pub summary: MetricSummary,
}

/// 本期与上一可比期对比
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub current_months: Vec<MonthKey>,
    pub prior_months: Vec<MonthKey>,
    pub current: MetricSummary,
    pub prior: MetricSummary,
}

impl PeriodComparison {
    /// 报废率变化（百分点）
    pub fn scrap_rate_delta(&self) -> Rate {
        self.current.scrap_rate.delta(self.prior.scrap_rate)
    }

    /// NCR 数变化
    pub fn ncr_delta(&self) -> i64 {
        self.current.ncr_count as i64 - self.prior.ncr_count as i64
    }
}
