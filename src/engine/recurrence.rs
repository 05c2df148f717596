// ==========================================
// ONE Tracker 质检分析引擎 - 复发问题分析
// ==========================================
// 流程:
// 1) 逐月按父 SKU 聚合，按报废数降序取前 N（报废为 0 不上榜）
// 2) 取截至选定月份的最近 recurrence_window_months 个月度快照
// 3) 上榜次数 >= recurrence_min_occurrences 即为复发
// 历史不足时按现有月份分析，并标记 insufficient_history
// ==========================================

use crate::config::ThresholdConfig;
use crate::domain::flags::{MonthlyProblemSnapshot, RecurrenceFlag, RecurrenceReport};
use crate::domain::inspection::InspectionRow;
use crate::domain::types::MonthKey;
use crate::engine::aggregator::{MetricAggregator, RankBy, RankOptions};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
pub struct RecurrenceAnalyzer {
    aggregator: MetricAggregator,
}

impl RecurrenceAnalyzer {
    pub fn new() -> Self {
        Self {
            aggregator: MetricAggregator::new(),
        }
    }

    /// 生成月度问题快照（按月升序）
    pub fn monthly_snapshots(
        &self,
        rows: &[InspectionRow],
        config: &ThresholdConfig,
    ) -> Vec<MonthlyProblemSnapshot> {
        let by_month = self
            .aggregator
            .aggregate_with(rows, |row| (row.month(), row.parent_sku.clone()));

        // (月份, 父 SKU) → 汇总，拆成每月一组
        let mut months: BTreeMap<MonthKey, BTreeMap<String, _>> = BTreeMap::new();
        for ((month, parent), summary) in by_month {
            months.entry(month).or_default().insert(parent, summary);
        }

        months
            .into_iter()
            .map(|(month, groups)| {
                let top_problem_skus = self
                    .aggregator
                    .rank(
                        &groups,
                        RankBy::ScrapTotal,
                        RankOptions {
                            top_n: Some(config.recurrence_top_n),
                            exclude_zero: true,
                            ..Default::default()
                        },
                    )
                    .into_iter()
                    .map(|(sku, _)| sku.clone())
                    .collect();
                MonthlyProblemSnapshot {
                    month,
                    top_problem_skus,
                }
            })
            .collect()
    }

    /// 查找复发问题 SKU
    ///
    /// - 窗口按日历月计：终点月及其前 `recurrence_window_months - 1` 个月
    /// - 窗口内无数据的月份没有快照，视为该月无 SKU 上榜
    /// - 最早的快照晚于窗口起点时为历史不足，按现有月份分析
    /// - `selected` 为 None 时以最晚的快照月份为终点
    #[instrument(skip_all, fields(snapshots = snapshots.len()))]
    pub fn find_recurring(
        &self,
        snapshots: &[MonthlyProblemSnapshot],
        selected: Option<MonthKey>,
        config: &ThresholdConfig,
    ) -> RecurrenceReport {
        let mut eligible: Vec<&MonthlyProblemSnapshot> = snapshots
            .iter()
            .filter(|s| selected.map_or(true, |end| s.month <= end))
            .collect();
        eligible.sort_by_key(|s| s.month);

        let (Some(earliest), Some(latest)) = (eligible.first(), eligible.last()) else {
            return RecurrenceReport {
                insufficient_history: true,
                ..Default::default()
            };
        };
        let end = selected.unwrap_or(latest.month);
        let start = end.offset(1 - config.recurrence_window_months as i32);
        let insufficient_history = earliest.month > start;
        let span_months = (end.months_since(earliest.month.max(start)) + 1) as usize;

        let window: Vec<&MonthlyProblemSnapshot> =
            eligible.into_iter().filter(|s| s.month >= start).collect();

        let mut appearances: BTreeMap<&str, Vec<MonthKey>> = BTreeMap::new();
        for snapshot in &window {
            // 同一快照内重复出现只计一次
            let mut seen: Vec<&str> = Vec::new();
            for sku in &snapshot.top_problem_skus {
                if seen.contains(&sku.as_str()) {
                    continue;
                }
                seen.push(sku.as_str());
                appearances.entry(sku.as_str()).or_default().push(snapshot.month);
            }
        }

        let mut flags: Vec<RecurrenceFlag> = appearances
            .into_iter()
            .filter(|(_, months)| months.len() >= config.recurrence_min_occurrences)
            .map(|(sku, months)| RecurrenceFlag {
                parent_sku: sku.to_string(),
                occurrences: months.len(),
                months,
            })
            .collect();
        flags.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| a.parent_sku.cmp(&b.parent_sku))
        });

        let report = RecurrenceReport {
            window: window.iter().map(|s| s.month).collect(),
            span_months,
            insufficient_history,
            flags,
        };
        debug!(
            window = report.window.len(),
            span = report.span_months,
            insufficient = report.insufficient_history,
            flags = report.flags.len(),
            "复发分析完成"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(month: u32, skus: &[&str]) -> MonthlyProblemSnapshot {
        MonthlyProblemSnapshot {
            month: MonthKey::new(2026, month).unwrap(),
            top_problem_skus: skus.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_window_ends_at_selected_month() {
        let snapshots = vec![
            snap(1, &["A"]),
            snap(2, &["A"]),
            snap(3, &["A"]),
            snap(4, &["B"]),
        ];
        let config = ThresholdConfig::default();
        let analyzer = RecurrenceAnalyzer::new();

        let report = analyzer.find_recurring(&snapshots, MonthKey::new(2026, 3), &config);
        assert_eq!(report.window.len(), 3);
        assert!(report.insufficient_history);
        assert_eq!(report.flags.len(), 1);
        assert_eq!(report.flags[0].parent_sku, "A");
        assert_eq!(report.flags[0].occurrences, 3);
    }

    #[test]
    fn test_window_drops_older_months() {
        let snapshots: Vec<MonthlyProblemSnapshot> = (1..=8)
            .map(|m| if m <= 2 { snap(m, &["OLD"]) } else { snap(m, &["NEW"]) })
            .collect();
        let mut config = ThresholdConfig::default();
        config.recurrence_min_occurrences = 2;
        let report = RecurrenceAnalyzer::new().find_recurring(&snapshots, None, &config);

        assert_eq!(report.window.len(), 6);
        assert!(!report.insufficient_history);
        let skus: Vec<&str> = report.flags.iter().map(|f| f.parent_sku.as_str()).collect();
        assert_eq!(skus, vec!["NEW"]);
    }

    #[test]
    fn test_empty_snapshots() {
        let report =
            RecurrenceAnalyzer::new().find_recurring(&[], None, &ThresholdConfig::default());
        assert!(report.window.is_empty());
        assert!(report.insufficient_history);
        assert!(report.flags.is_empty());
    }
}
