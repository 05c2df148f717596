// ==========================================
// 洞察规则表
// ==========================================
// 每条规则 = 适用角色 + 触发条件 + 文案 key + 文案参数
// 表内顺序即评估与输出顺序；所有阈值取自 ThresholdConfig
// ==========================================

use super::core::InsightContext;
use crate::domain::types::Role::{
    OperationsDirector as OPS, ProductionManager as PM, QcManager as QC, SewingManager as SEW,
};
use crate::domain::types::{Rate, Role, Severity};

type Predicate = fn(&InsightContext<'_>) -> bool;
type Args = fn(&InsightContext<'_>) -> Vec<(&'static str, String)>;

/// 规则严重度：固定或按数据分档
#[derive(Clone, Copy)]
pub enum RuleSeverity {
    Fixed(Severity),
    Graded(fn(&InsightContext<'_>) -> Severity),
}

impl RuleSeverity {
    pub fn resolve(self, ctx: &InsightContext<'_>) -> Severity {
        match self {
            RuleSeverity::Fixed(severity) => severity,
            RuleSeverity::Graded(grade) => grade(ctx),
        }
    }
}

/// 声明式洞察规则
pub struct InsightRule {
    pub id: &'static str,
    pub severity: RuleSeverity,
    pub applies_to: &'static [Role],
    pub predicate: Predicate,
    pub message_key: &'static str,
    pub args: Args,
}

impl InsightRule {
    pub fn applies(&self, role: Role) -> bool {
        self.applies_to.contains(&role)
    }
}

const ALL_ROLES: &[Role] = &[PM, QC, SEW, OPS];
const PASS_ROLES: &[Role] = &[PM, QC, OPS];

pub static RULES: &[InsightRule] = &[
    // PM 视图交期结论居首
    InsightRule {
        id: "on_time_on_target",
        severity: RuleSeverity::Fixed(Severity::Positive),
        applies_to: &[PM],
        predicate: on_time_on_target,
        message_key: "insight.on_time_on_target",
        args: on_time_args,
    },
    InsightRule {
        id: "on_time_below_target",
        severity: RuleSeverity::Fixed(Severity::Warning),
        applies_to: &[PM],
        predicate: on_time_below_target,
        message_key: "insight.on_time_below_target",
        args: on_time_args,
    },
    InsightRule {
        id: "pass_rate_excellent",
        severity: RuleSeverity::Fixed(Severity::Positive),
        applies_to: PASS_ROLES,
        predicate: pass_rate_excellent,
        message_key: "insight.pass_rate_excellent",
        args: pass_rate_args,
    },
    InsightRule {
        id: "pass_rate_watch",
        severity: RuleSeverity::Fixed(Severity::Warning),
        applies_to: PASS_ROLES,
        predicate: pass_rate_watch,
        message_key: "insight.pass_rate_watch",
        args: pass_rate_args,
    },
    InsightRule {
        id: "pass_rate_low",
        severity: RuleSeverity::Fixed(Severity::Critical),
        applies_to: PASS_ROLES,
        predicate: pass_rate_low,
        message_key: "insight.pass_rate_low",
        args: pass_rate_args,
    },
    InsightRule {
        id: "escape_signals",
        severity: RuleSeverity::Fixed(Severity::Critical),
        applies_to: &[PM, QC, OPS],
        predicate: escape_signals,
        message_key: "insight.escape_signals",
        args: escape_args,
    },
    InsightRule {
        id: "scrap_rate_elevated",
        severity: RuleSeverity::Fixed(Severity::Warning),
        applies_to: &[PM, QC, OPS],
        predicate: scrap_rate_elevated,
        message_key: "insight.scrap_rate_elevated",
        args: scrap_rate_args,
    },
    InsightRule {
        id: "repair_rate_elevated",
        severity: RuleSeverity::Fixed(Severity::Warning),
        applies_to: &[PM, SEW, OPS],
        predicate: repair_rate_elevated,
        message_key: "insight.repair_rate_elevated",
        args: repair_rate_args,
    },
    InsightRule {
        id: "sewing_capture",
        severity: RuleSeverity::Graded(sewing_capture_grade),
        applies_to: &[PM, QC, SEW],
        predicate: has_scrap,
        message_key: "insight.sewing_capture",
        args: sewing_capture_args,
    },
    InsightRule {
        id: "unstable_skus",
        severity: RuleSeverity::Fixed(Severity::Warning),
        applies_to: &[PM, QC, SEW],
        predicate: unstable_skus,
        message_key: "insight.unstable_skus",
        args: unstable_args,
    },
    InsightRule {
        id: "concentration_alert",
        severity: RuleSeverity::Fixed(Severity::Warning),
        applies_to: &[QC, OPS],
        predicate: has_concentration,
        message_key: "insight.concentration_alert",
        args: concentration_args,
    },
    InsightRule {
        id: "recurring_problems",
        severity: RuleSeverity::Fixed(Severity::Warning),
        applies_to: &[SEW, OPS],
        predicate: has_recurrence,
        message_key: "insight.recurring_problems",
        args: recurrence_args,
    },
    InsightRule {
        id: "scrap_rate_worsened",
        severity: RuleSeverity::Fixed(Severity::Warning),
        applies_to: ALL_ROLES,
        predicate: scrap_rate_worsened,
        message_key: "insight.scrap_rate_worsened",
        args: scrap_delta_args,
    },
    InsightRule {
        id: "scrap_rate_improved",
        severity: RuleSeverity::Fixed(Severity::Positive),
        applies_to: ALL_ROLES,
        predicate: scrap_rate_improved,
        message_key: "insight.scrap_rate_improved",
        args: scrap_delta_args,
    },
    InsightRule {
        id: "ncr_increase",
        severity: RuleSeverity::Fixed(Severity::Warning),
        applies_to: &[QC],
        predicate: ncr_increase,
        message_key: "insight.ncr_increase",
        args: ncr_delta_args,
    },
    InsightRule {
        id: "touch_rate_summary",
        severity: RuleSeverity::Fixed(Severity::Info),
        applies_to: &[OPS],
        predicate: touch_rate_defined,
        message_key: "insight.touch_rate_summary",
        args: touch_rate_args,
    },
];

/// 某角色适用的规则（保持表内顺序）
pub fn rules_for(role: Role) -> impl Iterator<Item = &'static InsightRule> {
    RULES.iter().filter(move |rule| rule.applies(role))
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value)
}

fn points(delta: Rate) -> String {
    match delta.value() {
        Some(v) => format!("{:.1}", v.abs()),
        None => "N/A".to_string(),
    }
}

// ==========================================
// 通过率
// ==========================================

fn pass_rate_excellent(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.pass_rate.at_least(ctx.config.excellent_pass_rate)
}

fn pass_rate_watch(ctx: &InsightContext<'_>) -> bool {
    let pass = ctx.summary.pass_rate;
    pass.at_least(ctx.config.watch_pass_rate) && pass.below(ctx.config.excellent_pass_rate)
}

fn pass_rate_low(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.pass_rate.below(ctx.config.watch_pass_rate)
}

fn pass_rate_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("rate", ctx.summary.pass_rate.to_string()),
        ("excellent", pct(ctx.config.excellent_pass_rate)),
        ("watch", pct(ctx.config.watch_pass_rate)),
    ]
}

// ==========================================
// 外流信号 / 报废 / 返修
// ==========================================

fn escape_signals(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.ncr_count > 0 || ctx.summary.red_flag_count > 0
}

fn escape_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("ncr", ctx.summary.ncr_count.to_string()),
        ("red_flags", ctx.summary.red_flag_count.to_string()),
    ]
}

fn scrap_rate_elevated(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.scrap_rate.at_least(ctx.config.attention_scrap_rate)
}

fn scrap_rate_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("rate", ctx.summary.scrap_rate.to_string()),
        ("threshold", pct(ctx.config.attention_scrap_rate)),
        ("scrap", ctx.summary.scrap_total.to_string()),
    ]
}

fn repair_rate_elevated(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.repair_rate.at_least(ctx.config.attention_repair_rate)
}

fn repair_rate_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("rate", ctx.summary.repair_rate.to_string()),
        ("threshold", pct(ctx.config.attention_repair_rate)),
        ("repairs", ctx.summary.repairs_total.to_string()),
    ]
}

// ==========================================
// 缝制拦截
// ==========================================

fn has_scrap(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.scrap_total > 0
}

fn sewing_capture_grade(ctx: &InsightContext<'_>) -> Severity {
    let capture = ctx.summary.pct_caught_at_sewing;
    if capture.at_least(ctx.config.good_sewing_capture) {
        Severity::Info
    } else if capture.at_least(ctx.config.fair_sewing_capture) {
        Severity::Warning
    } else {
        Severity::Critical
    }
}

fn sewing_capture_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("rate", ctx.summary.pct_caught_at_sewing.to_string()),
        ("qc_rate", ctx.summary.pct_caught_at_qc.to_string()),
        ("scrap", ctx.summary.scrap_total.to_string()),
    ]
}

fn unstable_skus(ctx: &InsightContext<'_>) -> bool {
    ctx.unstable_sku_count() > 0
}

fn unstable_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("count", ctx.unstable_sku_count().to_string()),
        ("threshold", pct(ctx.config.attention_fail_rate)),
        ("min_units", ctx.config.min_units_for_rate_tables.to_string()),
    ]
}

// ==========================================
// 交期
// ==========================================

fn on_time_on_target(ctx: &InsightContext<'_>) -> bool {
    ctx.on_time
        .is_some_and(|s| s.on_time_rate.at_least(ctx.config.on_time_target_pct))
}

fn on_time_below_target(ctx: &InsightContext<'_>) -> bool {
    ctx.on_time
        .is_some_and(|s| s.on_time_rate.below(ctx.config.on_time_target_pct))
}

fn on_time_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    let (rate, late) = ctx.on_time.map_or((Rate::undefined(), 0), |s| {
        (s.on_time_rate, s.late_orders)
    });
    vec![
        ("rate", rate.to_string()),
        ("target", pct(ctx.config.on_time_target_pct)),
        ("late_orders", late.to_string()),
    ]
}

// ==========================================
// 集中度 / 复发
// ==========================================

fn has_concentration(ctx: &InsightContext<'_>) -> bool {
    !ctx.concentration.is_empty()
}

fn concentration_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    let mut args = vec![("count", ctx.concentration.len().to_string())];
    if let Some(top) = ctx.concentration.first() {
        args.push(("inspector", top.inspector.clone()));
        args.push(("sku", top.parent_sku.clone()));
        args.push(("share", pct(top.share_pct())));
    }
    args
}

fn has_recurrence(ctx: &InsightContext<'_>) -> bool {
    ctx.recurrence.is_some_and(|r| !r.flags.is_empty())
}

fn recurrence_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    let Some(report) = ctx.recurrence else {
        return Vec::new();
    };
    let skus: Vec<&str> = report
        .flags
        .iter()
        .take(3)
        .map(|f| f.parent_sku.as_str())
        .collect();
    vec![
        ("count", report.flags.len().to_string()),
        ("skus", skus.join(", ")),
        ("months", report.span_months.to_string()),
    ]
}

// ==========================================
// 环比
// ==========================================

fn scrap_delta(ctx: &InsightContext<'_>) -> Rate {
    ctx.comparison
        .map_or(Rate::undefined(), |c| c.scrap_rate_delta())
}

fn scrap_rate_worsened(ctx: &InsightContext<'_>) -> bool {
    matches!(scrap_delta(ctx).value(), Some(d) if d > 0.0)
}

fn scrap_rate_improved(ctx: &InsightContext<'_>) -> bool {
    matches!(scrap_delta(ctx).value(), Some(d) if d < 0.0)
}

fn scrap_delta_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    let (current, prior) = ctx.comparison.map_or(
        (Rate::undefined(), Rate::undefined()),
        |c| (c.current.scrap_rate, c.prior.scrap_rate),
    );
    vec![
        ("delta", points(scrap_delta(ctx))),
        ("current", current.to_string()),
        ("prior", prior.to_string()),
    ]
}

fn ncr_increase(ctx: &InsightContext<'_>) -> bool {
    ctx.comparison.is_some_and(|c| c.ncr_delta() > 0)
}

fn ncr_delta_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    let (delta, current) = ctx
        .comparison
        .map_or((0, 0), |c| (c.ncr_delta(), c.current.ncr_count));
    vec![("delta", delta.to_string()), ("current", current.to_string())]
}

fn touch_rate_defined(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.touch_rate.is_defined()
}

fn touch_rate_args(ctx: &InsightContext<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("rate", ctx.summary.touch_rate.to_string()),
        ("units", ctx.summary.touch_units().to_string()),
    ]
}
