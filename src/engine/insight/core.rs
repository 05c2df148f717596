use super::rules::rules_for;
use crate::config::ThresholdConfig;
use crate::domain::flags::{ConcentrationFlag, RecurrenceReport};
use crate::domain::insight::InsightBullet;
use crate::domain::metrics::{MetricSummary, OnTimeSummary, PeriodComparison};
use crate::domain::types::Role;
use crate::engine::aggregator::GroupKey;
use crate::i18n::t_in_with_args;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// ==========================================
// InsightContext - 规则评估输入
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'a> {
    pub config: &'a ThresholdConfig,
    /// 本期整体汇总
    pub summary: &'a MetricSummary,
    /// 本期按父 SKU 汇总（不稳定 SKU 规则使用）
    pub sku_summaries: Option<&'a BTreeMap<GroupKey, MetricSummary>>,
    pub on_time: Option<&'a OnTimeSummary>,
    pub concentration: &'a [ConcentrationFlag],
    pub recurrence: Option<&'a RecurrenceReport>,
    /// 与上一可比期对比（无上期为 None）
    pub comparison: Option<&'a PeriodComparison>,
}

impl<'a> InsightContext<'a> {
    pub fn new(summary: &'a MetricSummary, config: &'a ThresholdConfig) -> Self {
        Self {
            config,
            summary,
            sku_summaries: None,
            on_time: None,
            concentration: &[],
            recurrence: None,
            comparison: None,
        }
    }

    pub fn with_sku_summaries(mut self, sku_summaries: &'a BTreeMap<GroupKey, MetricSummary>) -> Self {
        self.sku_summaries = Some(sku_summaries);
        self
    }

    pub fn with_on_time(mut self, on_time: &'a OnTimeSummary) -> Self {
        self.on_time = Some(on_time);
        self
    }

    pub fn with_concentration(mut self, flags: &'a [ConcentrationFlag]) -> Self {
        self.concentration = flags;
        self
    }

    pub fn with_recurrence(mut self, report: &'a RecurrenceReport) -> Self {
        self.recurrence = Some(report);
        self
    }

    pub fn with_comparison(mut self, comparison: Option<&'a PeriodComparison>) -> Self {
        self.comparison = comparison;
        self
    }

    /// 失败率 >= attention_fail_rate 且检验件数达到门槛的父 SKU 数
    pub fn unstable_sku_count(&self) -> usize {
        self.sku_summaries.map_or(0, |groups| {
            groups
                .values()
                .filter(|s| s.inspected >= self.config.min_units_for_rate_tables)
                .filter(|s| s.fail_rate.at_least(self.config.attention_fail_rate))
                .count()
        })
    }
}

// ==========================================
// InsightEngine - 洞察规则引擎
// ==========================================
#[derive(Debug, Default)]
pub struct InsightEngine;

impl InsightEngine {
    pub fn new() -> Self {
        Self
    }

    /// 评估角色规则表
    ///
    /// 按声明顺序逐条独立评估，每条触发的规则产生一条洞察，
    /// 最后按角色上限截断
    #[instrument(skip_all, fields(role = %role, locale = %locale))]
    pub fn evaluate(&self, role: Role, ctx: &InsightContext<'_>, locale: &str) -> Vec<InsightBullet> {
        let mut bullets: Vec<InsightBullet> = rules_for(role)
            .filter(|rule| (rule.predicate)(ctx))
            .map(|rule| InsightBullet {
                severity: rule.severity.resolve(ctx),
                text: t_in_with_args(locale, rule.message_key, &(rule.args)(ctx)),
                rule_id: rule.id,
            })
            .collect();

        let triggered = bullets.len();
        bullets.truncate(role.insight_cap());
        debug!(triggered, emitted = bullets.len(), "洞察规则评估完成");
        bullets
    }
}
