// ==========================================
// ONE Tracker 质检分析引擎 - 指标聚合器
// ==========================================
// 口径: 件数加权，先对分子、分母分别求和，再一次相除
// 公式（均为占检验件数 Inspected 的百分比）:
// - PassRate   = FinalQtyTotal / Inspected
// - FailRate   = ScrapRate = ScrapTotal / Inspected
// - RepairRate = RepairsTotal / Inspected
// - TouchRate  = (RepairsTotal + ScrapTotal) / Inspected
// - PctCaughtAtSewing / PctCaughtAtQC = SewFail / QCFail ÷ ScrapTotal
// 红线: 零分母得到显式未定义比率，不得为 0，不得 panic
// ==========================================

use crate::domain::inspection::InspectionRow;
use crate::domain::metrics::MetricSummary;
use crate::domain::types::{MonthKey, Rate};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ==========================================
// 分组键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Text(String),
    Day(NaiveDate),
    Month(MonthKey),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Text(s) => write!(f, "{}", s),
            GroupKey::Day(d) => write!(f, "{}", d),
            GroupKey::Month(m) => write!(f, "{}", m),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Sku,
    ParentSku,
    Inspector,
    Day,
    Month,
}

impl GroupBy {
    pub fn key_of(self, row: &InspectionRow) -> GroupKey {
        match self {
            GroupBy::Sku => GroupKey::Text(row.sku.clone()),
            GroupBy::ParentSku => GroupKey::Text(row.parent_sku.clone()),
            GroupBy::Inspector => GroupKey::Text(row.inspector.clone()),
            GroupBy::Day => GroupKey::Day(row.finished_date),
            GroupBy::Month => GroupKey::Month(row.month()),
        }
    }
}

// ==========================================
// 排名口径
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Inspected,
    ScrapTotal,
    FailRate,
    RepairsTotal,
    RepairRate,
    SewFailTotal,
    NcrCount,
    RedFlagCount,
    TouchUnits,
    PctCaughtAtSewing,
}

impl RankBy {
    /// 比率口径（受最小件数门槛约束）
    pub fn is_rate(self) -> bool {
        matches!(
            self,
            RankBy::FailRate | RankBy::RepairRate | RankBy::PctCaughtAtSewing
        )
    }

    fn value(self, summary: &MetricSummary) -> Option<f64> {
        match self {
            RankBy::Inspected => Some(summary.inspected as f64),
            RankBy::ScrapTotal => Some(summary.scrap_total as f64),
            RankBy::FailRate => summary.fail_rate.value(),
            RankBy::RepairsTotal => Some(summary.repairs_total as f64),
            RankBy::RepairRate => summary.repair_rate.value(),
            RankBy::SewFailTotal => Some(summary.sew_fail_total as f64),
            RankBy::NcrCount => Some(summary.ncr_count as f64),
            RankBy::RedFlagCount => Some(summary.red_flag_count as f64),
            RankBy::TouchUnits => Some(summary.touch_units() as f64),
            RankBy::PctCaughtAtSewing => summary.pct_caught_at_sewing.value(),
        }
    }
}

/// 排名选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RankOptions {
    /// 公平对比门槛：比率排名中剔除检验件数低于此值的分组
    pub min_units: Option<u64>,
    pub top_n: Option<usize>,
    pub ascending: bool,
    /// 剔除排名值为 0 的分组
    pub exclude_zero: bool,
}

// ==========================================
// 累加器
// ==========================================
#[derive(Default)]
struct MetricAccumulator<'a> {
    inspected: u64,
    repairs: u64,
    scrap: u64,
    final_qty: u64,
    qc_fail: u64,
    sew_fail: u64,
    red_flags: u64,
    ncrs: u64,
    units_with_due: u64,
    units_on_time: u64,
    orders: BTreeSet<&'a str>,
}

impl<'a> MetricAccumulator<'a> {
    fn add(&mut self, row: &'a InspectionRow) {
        self.inspected += u64::from(row.quantity);
        self.repairs += u64::from(row.repairs);
        self.scrap += u64::from(row.scrap);
        self.final_qty += u64::from(row.final_qty);
        self.qc_fail += u64::from(row.qc_fail);
        self.sew_fail += u64::from(row.sewing_fail);
        self.red_flags += u64::from(row.red_flag);
        self.ncrs += u64::from(row.ncr);
        if let Some(on_time) = row.finished_on_time() {
            self.units_with_due += u64::from(row.quantity);
            if on_time {
                self.units_on_time += u64::from(row.quantity);
            }
        }
        self.orders.insert(row.order_number.as_str());
    }

    fn finish(self) -> MetricSummary {
        let inspected = self.inspected;
        MetricSummary {
            inspected,
            repairs_total: self.repairs,
            scrap_total: self.scrap,
            final_qty_total: self.final_qty,
            qc_fail_total: self.qc_fail,
            sew_fail_total: self.sew_fail,
            orders_count: self.orders.len() as u64,
            red_flag_count: self.red_flags,
            ncr_count: self.ncrs,
            units_with_due_date: self.units_with_due,
            units_on_time: self.units_on_time,
            pass_rate: Rate::percent(self.final_qty, inspected),
            fail_rate: Rate::percent(self.scrap, inspected),
            repair_rate: Rate::percent(self.repairs, inspected),
            scrap_rate: Rate::percent(self.scrap, inspected),
            touch_rate: Rate::percent(self.repairs + self.scrap, inspected),
            on_time_rate: Rate::percent(self.units_on_time, self.units_with_due),
            pct_caught_at_sewing: Rate::percent(self.sew_fail, self.scrap),
            pct_caught_at_qc: Rate::percent(self.qc_fail, self.scrap),
        }
    }
}

// ==========================================
// MetricAggregator - 指标聚合器
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
#[derive(Debug, Default)]
pub struct MetricAggregator;

impl MetricAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 不分组汇总
    pub fn summarize<'a, I>(&self, rows: I) -> MetricSummary
    where
        I: IntoIterator<Item = &'a InspectionRow>,
    {
        let mut acc = MetricAccumulator::default();
        for row in rows {
            acc.add(row);
        }
        acc.finish()
    }

    /// 按内置口径分组汇总
    pub fn aggregate_by<'a, I>(&self, rows: I, group_by: GroupBy) -> BTreeMap<GroupKey, MetricSummary>
    where
        I: IntoIterator<Item = &'a InspectionRow>,
    {
        self.aggregate_with(rows, |row| group_by.key_of(row))
    }

    /// 按任意键分组汇总
    pub fn aggregate_with<'a, I, K, F>(&self, rows: I, key_fn: F) -> BTreeMap<K, MetricSummary>
    where
        I: IntoIterator<Item = &'a InspectionRow>,
        K: Ord,
        F: Fn(&InspectionRow) -> K,
    {
        let mut groups: BTreeMap<K, MetricAccumulator<'a>> = BTreeMap::new();
        for row in rows {
            groups.entry(key_fn(row)).or_default().add(row);
        }
        groups
            .into_iter()
            .map(|(key, acc)| (key, acc.finish()))
            .collect()
    }

    /// 分组排名
    ///
    /// - 比率口径按 `min_units` 剔除小样本分组（仅影响排名，不影响体量展示）
    /// - 未定义值始终排在最后
    /// - 并列按键升序，保证结果确定
    pub fn rank<'g, K: Ord>(
        &self,
        groups: &'g BTreeMap<K, MetricSummary>,
        rank_by: RankBy,
        options: RankOptions,
    ) -> Vec<(&'g K, &'g MetricSummary)> {
        let mut ranked: Vec<(&K, &MetricSummary, Option<f64>)> = groups
            .iter()
            .filter(|(_, summary)| {
                !(rank_by.is_rate()
                    && options
                        .min_units
                        .is_some_and(|floor| summary.inspected < floor))
            })
            .map(|(key, summary)| (key, summary, rank_by.value(summary)))
            .filter(|(_, _, value)| !(options.exclude_zero && *value == Some(0.0)))
            .collect();

        ranked.sort_by(|(ka, _, va), (kb, _, vb)| {
            let by_value = match (va, vb) {
                (Some(a), Some(b)) => {
                    if options.ascending {
                        a.total_cmp(b)
                    } else {
                        b.total_cmp(a)
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_value.then_with(|| ka.cmp(kb))
        });

        let limit = options.top_n.unwrap_or(usize::MAX);
        ranked
            .into_iter()
            .take(limit)
            .map(|(key, summary, _)| (key, summary))
            .collect()
    }
}
