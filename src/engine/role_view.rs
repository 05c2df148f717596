// ==========================================
// ONE Tracker 质检分析引擎 - 角色视图组装
// ==========================================
// 职责: 按角色选择卡片、表格与洞察规则，组装最终载荷
// 输入: 数据集 + 分析期间 + 分析配置
// 输出: RoleViewPayload
// ==========================================
// 各角色主表默认排序:
// - 生产经理: 报废数降序
// - 质检经理: NCR 数降序（检验员对比）
// - 缝制经理: 缝制拦截率升序（最差在前）
// - 运营总监: 触碰件数降序
// ==========================================

use crate::config::AnalysisProfile;
use crate::domain::flags::{ConcentrationFlag, RecurrenceReport};
use crate::domain::inspection::{InspectionDataset, InspectionRow};
use crate::domain::metrics::{MetricSummary, MonthlyTrendPoint, OnTimeSummary};
use crate::domain::types::{Rate, Role};
use crate::domain::view::{CardValue, Cell, DataQualitySummary, MetricCard, RoleViewPayload, ViewTable};
use crate::engine::aggregator::{GroupBy, GroupKey, MetricAggregator, RankBy, RankOptions};
use crate::engine::concentration::ConcentrationAnalyzer;
use crate::engine::insight::{InsightContext, InsightEngine};
use crate::engine::on_time::OnTimeAnalyzer;
use crate::engine::period::AnalysisPeriod;
use crate::engine::recurrence::RecurrenceAnalyzer;
use crate::engine::trend::TrendAnalyzer;
use crate::i18n::t_in;
use std::collections::BTreeMap;
use tracing::{info, instrument};

// ==========================================
// 表格列定义
// ==========================================
#[derive(Debug, Clone, Copy)]
enum Column {
    Inspected,
    Orders,
    Scrap,
    FailRate,
    Repairs,
    RepairRate,
    SewFail,
    QcFail,
    PctSewing,
    Ncr,
    RedFlags,
    TouchUnits,
    TouchRate,
    PassRate,
    ScrapRate,
}

impl Column {
    fn label_key(self) -> &'static str {
        match self {
            Column::Inspected => "column.inspected",
            Column::Orders => "column.orders",
            Column::Scrap => "column.scrap",
            Column::FailRate => "column.fail_rate",
            Column::Repairs => "column.repairs",
            Column::RepairRate => "column.repair_rate",
            Column::SewFail => "column.sew_fail",
            Column::QcFail => "column.qc_fail",
            Column::PctSewing => "column.pct_sewing",
            Column::Ncr => "column.ncr",
            Column::RedFlags => "column.red_flags",
            Column::TouchUnits => "column.touch_units",
            Column::TouchRate => "column.touch_rate",
            Column::PassRate => "column.pass_rate",
            Column::ScrapRate => "column.scrap_rate",
        }
    }

    fn cell(self, s: &MetricSummary) -> Cell {
        match self {
            Column::Inspected => Cell::Count(s.inspected),
            Column::Orders => Cell::Count(s.orders_count),
            Column::Scrap => Cell::Count(s.scrap_total),
            Column::FailRate => Cell::Rate(s.fail_rate),
            Column::Repairs => Cell::Count(s.repairs_total),
            Column::RepairRate => Cell::Rate(s.repair_rate),
            Column::SewFail => Cell::Count(s.sew_fail_total),
            Column::QcFail => Cell::Count(s.qc_fail_total),
            Column::PctSewing => Cell::Rate(s.pct_caught_at_sewing),
            Column::Ncr => Cell::Count(s.ncr_count),
            Column::RedFlags => Cell::Count(s.red_flag_count),
            Column::TouchUnits => Cell::Count(s.touch_units()),
            Column::TouchRate => Cell::Rate(s.touch_rate),
            Column::PassRate => Cell::Rate(s.pass_rate),
            Column::ScrapRate => Cell::Rate(s.scrap_rate),
        }
    }
}

/// 本期分析中间结果（各角色共享）
struct PeriodAnalysis {
    rows: Vec<InspectionRow>,
    summary: MetricSummary,
    by_sku: BTreeMap<GroupKey, MetricSummary>,
    by_inspector: BTreeMap<GroupKey, MetricSummary>,
    on_time: OnTimeSummary,
    concentration: Vec<ConcentrationFlag>,
    recurrence: RecurrenceReport,
}

// ==========================================
// RoleViewComposer - 角色视图组装器
// ==========================================
pub struct RoleViewComposer<'a> {
    profile: &'a AnalysisProfile,
    aggregator: MetricAggregator,
    on_time: OnTimeAnalyzer,
    trend: TrendAnalyzer,
    concentration: ConcentrationAnalyzer,
    recurrence: RecurrenceAnalyzer,
    insight: InsightEngine,
}

impl<'a> RoleViewComposer<'a> {
    pub fn new(profile: &'a AnalysisProfile) -> Self {
        Self {
            profile,
            aggregator: MetricAggregator::new(),
            on_time: OnTimeAnalyzer::new(),
            trend: TrendAnalyzer::new(),
            concentration: ConcentrationAnalyzer::new(),
            recurrence: RecurrenceAnalyzer::new(),
            insight: InsightEngine::new(),
        }
    }

    /// 组装角色视图
    #[instrument(skip_all, fields(role = %role, period = %period, rows = dataset.rows.len()))]
    pub fn compose(
        &self,
        role: Role,
        dataset: &InspectionDataset,
        period: &AnalysisPeriod,
    ) -> RoleViewPayload {
        let analysis = self.analyze(dataset, period);
        let thresholds = &self.profile.thresholds;
        let comparison = self.trend.compare(&dataset.rows, period);

        let ctx = InsightContext::new(&analysis.summary, thresholds)
            .with_sku_summaries(&analysis.by_sku)
            .with_on_time(&analysis.on_time)
            .with_concentration(&analysis.concentration)
            .with_recurrence(&analysis.recurrence)
            .with_comparison(comparison.as_ref());
        let insights = self.insight.evaluate(role, &ctx, &self.profile.locale);

        let (cards, tables) = match role {
            Role::ProductionManager => (
                self.production_cards(&analysis),
                self.production_tables(&analysis),
            ),
            Role::QcManager => (self.qc_cards(&analysis), self.qc_tables(&analysis)),
            Role::SewingManager => (self.sewing_cards(&analysis), self.sewing_tables(&analysis)),
            Role::OperationsDirector => {
                let trend = self.trend.monthly_trend(&dataset.rows, period);
                (self.operations_cards(&analysis), self.operations_tables(&analysis, &trend))
            }
        };

        let data_quality = self.data_quality(dataset, &analysis);

        info!(
            cards = cards.len(),
            tables = tables.len(),
            insights = insights.len(),
            rejected = data_quality.rows_rejected,
            "角色视图组装完成"
        );

        RoleViewPayload {
            role,
            title: self.label(role.label_key()),
            period: period.months().to_vec(),
            cards,
            tables,
            insights,
            data_quality,
        }
    }

    fn analyze(&self, dataset: &InspectionDataset, period: &AnalysisPeriod) -> PeriodAnalysis {
        let thresholds = &self.profile.thresholds;
        let rows: Vec<InspectionRow> = dataset
            .rows
            .iter()
            .filter(|r| period.contains(r.month()))
            .cloned()
            .collect();

        // 复发分析使用全量历史，窗口以本期锚定月份为终点
        let snapshots = self.recurrence.monthly_snapshots(&dataset.rows, thresholds);
        let recurrence = self
            .recurrence
            .find_recurring(&snapshots, period.anchor(), thresholds);

        PeriodAnalysis {
            summary: self.aggregator.summarize(&rows),
            by_sku: self.aggregator.aggregate_by(&rows, GroupBy::ParentSku),
            by_inspector: self.aggregator.aggregate_by(&rows, GroupBy::Inspector),
            on_time: self.on_time.analyze(&rows),
            concentration: self
                .concentration
                .find_concentration(&rows, thresholds, &self.profile.roster),
            recurrence,
            rows,
        }
    }

    // ==========================================
    // 生产经理
    // ==========================================

    fn production_cards(&self, a: &PeriodAnalysis) -> Vec<MetricCard> {
        let s = &a.summary;
        vec![
            self.card("pass_rate", CardValue::Rate(s.pass_rate)),
            self.card("fail_rate", CardValue::Rate(s.fail_rate)),
            self.card("repair_rate", CardValue::Rate(s.repair_rate)),
            self.card("scrap_rate", CardValue::Rate(s.scrap_rate)),
            self.card("inspected", CardValue::Count(s.inspected)),
            self.card("orders", CardValue::Count(s.orders_count)),
            self.card("on_time_rate", CardValue::Rate(a.on_time.on_time_rate)),
            self.card("late_orders", CardValue::Count(a.on_time.late_orders)),
            self.card(
                "total_days_late",
                CardValue::Count(a.on_time.total_days_late.max(0) as u64),
            ),
            self.card("avg_days_late", CardValue::Days(a.on_time.avg_days_late)),
        ]
    }

    fn production_tables(&self, a: &PeriodAnalysis) -> Vec<ViewTable> {
        let t = &self.profile.thresholds;
        vec![
            self.summary_table(
                "problem_skus_by_fail_count",
                "column.parent_sku",
                self.aggregator.rank(
                    &a.by_sku,
                    RankBy::ScrapTotal,
                    self.top(false, true, None),
                ),
                &[Column::Inspected, Column::Scrap, Column::FailRate, Column::Repairs],
            ),
            self.summary_table(
                "problem_skus_by_fail_rate",
                "column.parent_sku",
                self.aggregator.rank(
                    &a.by_sku,
                    RankBy::FailRate,
                    self.top(false, true, Some(t.min_units_for_rate_tables)),
                ),
                &[Column::Inspected, Column::Scrap, Column::FailRate],
            ),
            self.summary_table(
                "top_repairs",
                "column.parent_sku",
                self.aggregator.rank(
                    &a.by_sku,
                    RankBy::RepairsTotal,
                    self.top(false, true, None),
                ),
                &[Column::Inspected, Column::Repairs, Column::RepairRate],
            ),
            self.summary_table(
                "inspector_summary",
                "column.inspector",
                self.aggregator
                    .rank(&a.by_inspector, RankBy::Inspected, RankOptions::default()),
                &[
                    Column::Inspected,
                    Column::Orders,
                    Column::Scrap,
                    Column::FailRate,
                    Column::Repairs,
                ],
            ),
            self.late_orders_table(&a.rows),
        ]
    }

    fn late_orders_table(&self, rows: &[InspectionRow]) -> ViewTable {
        let mut late: Vec<(&InspectionRow, i64)> = rows
            .iter()
            .filter_map(|r| r.days_late().filter(|d| *d > 0).map(|d| (r, d)))
            .collect();
        late.sort_by(|(ra, da), (rb, db)| {
            db.cmp(da)
                .then_with(|| ra.order_number.cmp(&rb.order_number))
                .then_with(|| ra.sku.cmp(&rb.sku))
        });

        let rows = late
            .into_iter()
            .take(self.profile.thresholds.top_table_rows)
            .map(|(r, days)| {
                vec![
                    Cell::Text(r.order_number.clone()),
                    Cell::Text(r.sku.clone()),
                    Cell::Text(r.due_date.map(|d| d.to_string()).unwrap_or_default()),
                    Cell::Text(r.finished_date.to_string()),
                    Cell::Count(days.max(0) as u64),
                ]
            })
            .collect();

        self.table(
            "late_orders",
            &[
                "column.order",
                "column.sku",
                "column.due_date",
                "column.finished_date",
                "column.days_late",
            ],
            rows,
        )
    }

    // ==========================================
    // 质检经理
    // ==========================================

    fn qc_cards(&self, a: &PeriodAnalysis) -> Vec<MetricCard> {
        let s = &a.summary;
        vec![
            self.card("pass_rate", CardValue::Rate(s.pass_rate)),
            self.card("fail_rate", CardValue::Rate(s.fail_rate)),
            self.card("inspected", CardValue::Count(s.inspected)),
            self.card("red_flags", CardValue::Count(s.red_flag_count)),
            self.card("ncr", CardValue::Count(s.ncr_count)),
            self.card("pct_caught_at_sewing", CardValue::Rate(s.pct_caught_at_sewing)),
            self.card("pct_caught_at_qc", CardValue::Rate(s.pct_caught_at_qc)),
        ]
    }

    fn qc_tables(&self, a: &PeriodAnalysis) -> Vec<ViewTable> {
        let roster = &self.profile.roster;
        let (comparable, reference): (BTreeMap<_, _>, BTreeMap<_, _>) = a
            .by_inspector
            .iter()
            .filter(|(k, _)| !roster.is_former(&k.to_string()))
            .map(|(k, s)| (k.clone(), s.clone()))
            .partition(|(k, _)| !roster.is_reference_only(&k.to_string()));

        vec![
            self.summary_table(
                "inspector_comparison",
                "column.inspector",
                self.aggregator
                    .rank(&comparable, RankBy::NcrCount, RankOptions::default()),
                &[
                    Column::Inspected,
                    Column::Orders,
                    Column::Ncr,
                    Column::RedFlags,
                    Column::Scrap,
                    Column::FailRate,
                ],
            ),
            self.concentration_table(&a.concentration),
            self.flagged_orders_table(&a.rows),
            self.summary_table(
                "reference_inspectors",
                "column.inspector",
                self.aggregator
                    .rank(&reference, RankBy::Inspected, RankOptions::default()),
                &[Column::Inspected, Column::Orders, Column::Scrap],
            ),
        ]
    }

    fn flagged_orders_table(&self, rows: &[InspectionRow]) -> ViewTable {
        let mut flagged: Vec<&InspectionRow> =
            rows.iter().filter(|r| r.red_flag || r.ncr).collect();
        flagged.sort_by(|a, b| {
            b.finished_date
                .cmp(&a.finished_date)
                .then_with(|| a.order_number.cmp(&b.order_number))
                .then_with(|| a.sku.cmp(&b.sku))
        });

        let rows = flagged
            .into_iter()
            .map(|r| {
                vec![
                    Cell::Text(r.order_number.clone()),
                    Cell::Text(r.sku.clone()),
                    Cell::Text(r.inspector.clone()),
                    Cell::Count(u64::from(r.quantity)),
                    Cell::Flag(r.red_flag),
                    Cell::Flag(r.ncr),
                ]
            })
            .collect();

        self.table(
            "flagged_orders",
            &[
                "column.order",
                "column.sku",
                "column.inspector",
                "column.quantity",
                "column.red_flags",
                "column.ncr",
            ],
            rows,
        )
    }

    fn concentration_table(&self, flags: &[ConcentrationFlag]) -> ViewTable {
        let rows = flags
            .iter()
            .map(|f| {
                vec![
                    Cell::Text(f.parent_sku.clone()),
                    Cell::Text(f.inspector.clone()),
                    Cell::Rate(Rate::from_value(f.share_pct())),
                    Cell::Count(f.inspector_orders),
                    Cell::Count(f.total_orders_for_sku),
                ]
            })
            .collect();

        self.table(
            "concentration_alerts",
            &[
                "column.parent_sku",
                "column.inspector",
                "column.share",
                "column.inspector_orders",
                "column.total_orders",
            ],
            rows,
        )
    }

    // ==========================================
    // 缝制经理
    // ==========================================

    fn sewing_cards(&self, a: &PeriodAnalysis) -> Vec<MetricCard> {
        let s = &a.summary;
        vec![
            self.card("sew_fail_total", CardValue::Count(s.sew_fail_total)),
            self.card("qc_fail_total", CardValue::Count(s.qc_fail_total)),
            self.card("pct_caught_at_sewing", CardValue::Rate(s.pct_caught_at_sewing)),
            self.card("repairs_total", CardValue::Count(s.repairs_total)),
            self.card("repair_rate", CardValue::Rate(s.repair_rate)),
        ]
    }

    fn sewing_tables(&self, a: &PeriodAnalysis) -> Vec<ViewTable> {
        let t = &self.profile.thresholds;
        vec![
            self.summary_table(
                "sewing_capture_by_sku",
                "column.parent_sku",
                self.aggregator.rank(
                    &a.by_sku,
                    RankBy::PctCaughtAtSewing,
                    self.top(true, false, Some(t.min_units_for_rate_tables)),
                ),
                &[
                    Column::Inspected,
                    Column::Scrap,
                    Column::SewFail,
                    Column::QcFail,
                    Column::PctSewing,
                ],
            ),
            self.recurrence_table(&a.recurrence),
            self.summary_table(
                "top_sewing_fails",
                "column.parent_sku",
                self.aggregator.rank(
                    &a.by_sku,
                    RankBy::SewFailTotal,
                    self.top(false, true, None),
                ),
                &[Column::Inspected, Column::SewFail, Column::Scrap],
            ),
            self.summary_table(
                "top_repairs",
                "column.parent_sku",
                self.aggregator.rank(
                    &a.by_sku,
                    RankBy::RepairsTotal,
                    self.top(false, true, None),
                ),
                &[Column::Inspected, Column::Repairs, Column::RepairRate],
            ),
        ]
    }

    fn recurrence_table(&self, report: &RecurrenceReport) -> ViewTable {
        let rows = report
            .flags
            .iter()
            .map(|f| {
                let months: Vec<String> = f.months.iter().map(|m| m.to_string()).collect();
                vec![
                    Cell::Text(f.parent_sku.clone()),
                    Cell::Count(f.occurrences as u64),
                    Cell::Text(months.join(", ")),
                ]
            })
            .collect();

        self.table(
            "recurring_problems",
            &["column.parent_sku", "column.occurrences", "column.months"],
            rows,
        )
    }

    // ==========================================
    // 运营总监
    // ==========================================

    fn operations_cards(&self, a: &PeriodAnalysis) -> Vec<MetricCard> {
        let s = &a.summary;
        vec![
            self.card("pass_rate", CardValue::Rate(s.pass_rate)),
            self.card("fail_rate", CardValue::Rate(s.fail_rate)),
            self.card("touch_rate", CardValue::Rate(s.touch_rate)),
            self.card("scrap_rate", CardValue::Rate(s.scrap_rate)),
            self.card("inspected", CardValue::Count(s.inspected)),
            self.card("orders", CardValue::Count(s.orders_count)),
            self.card("red_flags", CardValue::Count(s.red_flag_count)),
            self.card("ncr", CardValue::Count(s.ncr_count)),
        ]
    }

    fn operations_tables(&self, a: &PeriodAnalysis, trend: &[MonthlyTrendPoint]) -> Vec<ViewTable> {
        // 只统计红旗行：orders 即为红旗订单去重数
        let red_flag_groups = self
            .aggregator
            .aggregate_by(a.rows.iter().filter(|r| r.red_flag), GroupBy::ParentSku);

        vec![
            self.summary_table(
                "touch_by_sku",
                "column.parent_sku",
                self.aggregator.rank(
                    &a.by_sku,
                    RankBy::TouchUnits,
                    self.top(false, true, None),
                ),
                &[
                    Column::Inspected,
                    Column::Repairs,
                    Column::Scrap,
                    Column::TouchUnits,
                    Column::TouchRate,
                ],
            ),
            self.trend_table(trend),
            self.summary_table(
                "red_flags_by_sku",
                "column.parent_sku",
                self.aggregator.rank(
                    &red_flag_groups,
                    RankBy::RedFlagCount,
                    self.top(false, true, None),
                ),
                &[Column::RedFlags, Column::Orders],
            ),
            self.concentration_table(&a.concentration),
        ]
    }

    fn trend_table(&self, trend: &[MonthlyTrendPoint]) -> ViewTable {
        let columns = [
            Column::Inspected,
            Column::PassRate,
            Column::ScrapRate,
            Column::RepairRate,
            Column::TouchRate,
            Column::Ncr,
        ];
        let rows = trend
            .iter()
            .map(|point| {
                let mut cells = vec![Cell::Text(point.month.to_string())];
                cells.extend(columns.iter().map(|c| c.cell(&point.summary)));
                cells
            })
            .collect();

        let mut keys = vec!["column.month"];
        keys.extend(columns.iter().map(|c| c.label_key()));
        self.table("monthly_trend", &keys, rows)
    }

    // ==========================================
    // 数据质量
    // ==========================================

    fn data_quality(&self, dataset: &InspectionDataset, a: &PeriodAnalysis) -> DataQualitySummary {
        let mut rejections_by_kind = BTreeMap::new();
        for rejection in &dataset.rejections {
            *rejections_by_kind.entry(rejection.kind).or_insert(0) += 1;
        }

        let tolerance = self.profile.thresholds.capture_tolerance_pct;
        let capture_divergent_skus = a
            .by_sku
            .iter()
            .filter(|(_, s)| !s.capture_within_tolerance(tolerance))
            .map(|(k, _)| k.to_string())
            .collect();

        DataQualitySummary {
            rows_analyzed: a.rows.len(),
            rows_rejected: dataset.rejections.len(),
            rejections_by_kind,
            excluded_other_stream: dataset.excluded_other_stream,
            orders_missing_due_date: a.on_time.orders_missing_due_date,
            capture_divergent_skus,
        }
    }

    // ==========================================
    // 辅助
    // ==========================================

    fn label(&self, key: &str) -> String {
        t_in(&self.profile.locale, key)
    }

    fn card(&self, id: &'static str, value: CardValue) -> MetricCard {
        MetricCard {
            id,
            label: self.label(&format!("card.{}", id)),
            value,
        }
    }

    fn top(&self, ascending: bool, exclude_zero: bool, min_units: Option<u64>) -> RankOptions {
        RankOptions {
            min_units,
            top_n: Some(self.profile.thresholds.top_table_rows),
            ascending,
            exclude_zero,
        }
    }

    fn table(&self, id: &'static str, column_keys: &[&str], rows: Vec<Vec<Cell>>) -> ViewTable {
        ViewTable {
            id,
            title: self.label(&format!("table.{}", id)),
            columns: column_keys.iter().map(|k| self.label(k)).collect(),
            rows,
        }
    }

    fn summary_table(
        &self,
        id: &'static str,
        key_column: &str,
        ranked: Vec<(&GroupKey, &MetricSummary)>,
        columns: &[Column],
    ) -> ViewTable {
        let rows = ranked
            .into_iter()
            .map(|(key, summary)| {
                let mut cells = vec![Cell::Text(key.to_string())];
                cells.extend(columns.iter().map(|c| c.cell(summary)));
                cells
            })
            .collect();

        let mut keys = vec![key_column];
        keys.extend(columns.iter().map(|c| c.label_key()));
        self.table(id, &keys, rows)
    }
}
