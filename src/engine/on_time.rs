// ==========================================
// ONE Tracker 质检分析引擎 - 交期达成分析
// ==========================================
// 口径:
// - 订单口径: 按订单号去重，订单的完工日取其各行最晚完工日，
//   交期取各行最早交期；完工日 > 交期 即延期
// - 件数口径: on_time_rate = 按期完工件数 / 有交期件数
// - 无交期的订单不参与计算，单独计数（数据质量提示）
// ==========================================

use crate::domain::inspection::InspectionRow;
use crate::domain::metrics::OnTimeSummary;
use crate::domain::types::Rate;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Default)]
struct OrderDates {
    latest_finished: Option<NaiveDate>,
    earliest_due: Option<NaiveDate>,
}

// ==========================================
// OnTimeAnalyzer - 交期达成分析器
// ==========================================
#[derive(Debug, Default)]
pub struct OnTimeAnalyzer;

impl OnTimeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze<'a, I>(&self, rows: I) -> OnTimeSummary
    where
        I: IntoIterator<Item = &'a InspectionRow>,
    {
        let mut orders: BTreeMap<&str, OrderDates> = BTreeMap::new();
        let mut units_with_due = 0u64;
        let mut units_on_time = 0u64;

        for row in rows {
            let entry = orders.entry(row.order_number.as_str()).or_default();
            entry.latest_finished = entry.latest_finished.max(Some(row.finished_date));
            if let Some(due) = row.due_date {
                entry.earliest_due = Some(entry.earliest_due.map_or(due, |d| d.min(due)));
            }

            if let Some(on_time) = row.finished_on_time() {
                units_with_due += u64::from(row.quantity);
                if on_time {
                    units_on_time += u64::from(row.quantity);
                }
            }
        }

        let mut summary = OnTimeSummary::default();
        for dates in orders.values() {
            match (dates.earliest_due, dates.latest_finished) {
                (Some(due), Some(finished)) => {
                    summary.orders_evaluated += 1;
                    if finished > due {
                        summary.late_orders += 1;
                        summary.total_days_late += (finished - due).num_days();
                    }
                }
                _ => summary.orders_missing_due_date += 1,
            }
        }

        if summary.late_orders > 0 {
            summary.avg_days_late =
                Some(summary.total_days_late as f64 / summary.late_orders as f64);
        }
        summary.on_time_rate = Rate::percent(units_on_time, units_with_due);
        summary
    }
}
