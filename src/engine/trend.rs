// ==========================================
// ONE Tracker 质检分析引擎 - 月度趋势与环比
// ==========================================
// 职责:
// - 期间内逐月汇总（无数据的月份保留为空汇总，比率未定义）
// - 本期 vs 上一可比期；上一期无检验件数视为无可比数据
// ==========================================

use crate::domain::inspection::InspectionRow;
use crate::domain::metrics::{MonthlyTrendPoint, PeriodComparison};
use crate::engine::aggregator::{GroupBy, GroupKey, MetricAggregator};
use crate::engine::period::AnalysisPeriod;

#[derive(Debug, Default)]
pub struct TrendAnalyzer {
    aggregator: MetricAggregator,
}

impl TrendAnalyzer {
    pub fn new() -> Self {
        Self {
            aggregator: MetricAggregator::new(),
        }
    }

    /// 期间内逐月趋势（按月升序）
    pub fn monthly_trend(&self, rows: &[InspectionRow], period: &AnalysisPeriod) -> Vec<MonthlyTrendPoint> {
        let by_month = self.aggregator.aggregate_by(
            rows.iter().filter(|r| period.contains(r.month())),
            GroupBy::Month,
        );
        period
            .months()
            .iter()
            .map(|&month| MonthlyTrendPoint {
                month,
                summary: by_month
                    .get(&GroupKey::Month(month))
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// 本期与上一可比期对比
    ///
    /// 上一可比期没有任何检验件数时返回 None
    pub fn compare(&self, rows: &[InspectionRow], period: &AnalysisPeriod) -> Option<PeriodComparison> {
        let prior_period = period.prior_comparable()?;

        let prior = self
            .aggregator
            .summarize(rows.iter().filter(|r| prior_period.contains(r.month())));
        if prior.inspected == 0 {
            return None;
        }

        let current = self
            .aggregator
            .summarize(rows.iter().filter(|r| period.contains(r.month())));

        Some(PeriodComparison {
            current_months: period.months().to_vec(),
            prior_months: prior_period.months().to_vec(),
            current,
            prior,
        })
    }
}
