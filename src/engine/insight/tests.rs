use super::*;
use crate::config::ThresholdConfig;
use crate::domain::flags::{ConcentrationFlag, RecurrenceFlag, RecurrenceReport};
use crate::domain::metrics::{MetricSummary, OnTimeSummary, PeriodComparison};
use crate::domain::types::{MonthKey, Rate, Role, Severity};
use std::collections::HashSet;

// ==========================================
// 测试辅助函数
// ==========================================

/// 构造整体汇总（缝制拦截覆盖全部报废）
fn summary(inspected: u64, scrap: u64, repairs: u64) -> MetricSummary {
    MetricSummary {
        inspected,
        scrap_total: scrap,
        repairs_total: repairs,
        final_qty_total: inspected - scrap,
        sew_fail_total: scrap,
        pass_rate: Rate::percent(inspected - scrap, inspected),
        fail_rate: Rate::percent(scrap, inspected),
        scrap_rate: Rate::percent(scrap, inspected),
        repair_rate: Rate::percent(repairs, inspected),
        touch_rate: Rate::percent(repairs + scrap, inspected),
        pct_caught_at_sewing: Rate::percent(scrap, scrap),
        pct_caught_at_qc: Rate::percent(0, scrap),
        ..Default::default()
    }
}

fn ids(bullets: &[crate::domain::insight::InsightBullet]) -> Vec<&'static str> {
    bullets.iter().map(|b| b.rule_id).collect()
}

// ==========================================
// 规则表结构
// ==========================================

#[test]
fn test_rule_ids_unique_and_keys_prefixed() {
    let mut seen = HashSet::new();
    for rule in RULES {
        assert!(seen.insert(rule.id), "重复规则 ID: {}", rule.id);
        assert!(rule.message_key.starts_with("insight."));
        assert!(!rule.applies_to.is_empty());
    }
}

#[test]
fn test_every_role_has_rules() {
    for role in Role::ALL {
        assert!(rules_for(role).count() > 0);
    }
}

// ==========================================
// 评估行为
// ==========================================

#[test]
fn test_excellent_pass_rate_single_positive() {
    let config = ThresholdConfig::default();
    let s = summary(1000, 10, 5);
    let ctx = InsightContext::new(&s, &config);
    let bullets = InsightEngine::new().evaluate(Role::ProductionManager, &ctx, "en");

    let positives = bullets
        .iter()
        .filter(|b| b.severity == Severity::Positive)
        .count();
    assert_eq!(positives, 1);
    assert!(bullets.iter().all(|b| !b.severity.is_alert()));
    assert_eq!(bullets[0].rule_id, "pass_rate_excellent");
}

#[test]
fn test_scrap_rate_value_interpolated() {
    let config = ThresholdConfig::default();
    let s = summary(100, 3, 0);
    let ctx = InsightContext::new(&s, &config);
    let bullets = InsightEngine::new().evaluate(Role::ProductionManager, &ctx, "en");

    let scrap = bullets
        .iter()
        .find(|b| b.rule_id == "scrap_rate_elevated")
        .unwrap();
    assert_eq!(scrap.severity, Severity::Warning);
    assert!(scrap.text.contains("3.0%"));
    assert!(scrap.text.contains("2.0%"));
}

#[test]
fn test_sewing_capture_grading() {
    let config = ThresholdConfig::default();
    let mut s = summary(100, 10, 0);
    s.sew_fail_total = 4;
    s.qc_fail_total = 6;
    s.pct_caught_at_sewing = Rate::percent(4, 10);
    let ctx = InsightContext::new(&s, &config);
    let bullets = InsightEngine::new().evaluate(Role::SewingManager, &ctx, "en");

    let capture = bullets.iter().find(|b| b.rule_id == "sewing_capture").unwrap();
    assert_eq!(capture.severity, Severity::Critical);
    assert!(capture.text.contains("40.0%"));
}

#[test]
fn test_comparison_rules_skipped_without_prior() {
    let config = ThresholdConfig::default();
    let s = summary(100, 1, 0);
    let ctx = InsightContext::new(&s, &config).with_comparison(None);
    let bullets = InsightEngine::new().evaluate(Role::QcManager, &ctx, "en");
    let triggered = ids(&bullets);
    assert!(!triggered.contains(&"scrap_rate_worsened"));
    assert!(!triggered.contains(&"scrap_rate_improved"));
    assert!(!triggered.contains(&"ncr_increase"));
}

#[test]
fn test_comparison_worsened() {
    let config = ThresholdConfig::default();
    let current = summary(100, 1, 0);
    let comparison = PeriodComparison {
        current_months: vec![MonthKey::new(2026, 2).unwrap()],
        prior_months: vec![MonthKey::new(2026, 1).unwrap()],
        current: summary(100, 1, 0),
        prior: summary(200, 1, 0),
    };
    let ctx = InsightContext::new(&current, &config).with_comparison(Some(&comparison));
    let bullets = InsightEngine::new().evaluate(Role::SewingManager, &ctx, "en");
    let worsened = bullets
        .iter()
        .find(|b| b.rule_id == "scrap_rate_worsened")
        .unwrap();
    assert!(worsened.text.contains("0.5"));
}

#[test]
fn test_role_specific_flags() {
    let config = ThresholdConfig::default();
    let s = summary(1000, 10, 5);
    let flags = vec![ConcentrationFlag {
        parent_sku: "AC-ESE".to_string(),
        inspector: "ANA".to_string(),
        share_of_volume: 0.6,
        inspector_units: 60,
        sku_units: 100,
        inspector_orders: 7,
        total_orders_for_sku: 12,
    }];
    let report = RecurrenceReport {
        window: vec![MonthKey::new(2026, 1).unwrap()],
        span_months: 1,
        insufficient_history: true,
        flags: vec![RecurrenceFlag {
            parent_sku: "PC-F20".to_string(),
            occurrences: 3,
            months: vec![],
        }],
    };
    let ctx = InsightContext::new(&s, &config)
        .with_concentration(&flags)
        .with_recurrence(&report);
    let engine = InsightEngine::new();

    let qc = ids(&engine.evaluate(Role::QcManager, &ctx, "en"));
    assert!(qc.contains(&"concentration_alert"));
    assert!(!qc.contains(&"recurring_problems"));

    let sewing = ids(&engine.evaluate(Role::SewingManager, &ctx, "en"));
    assert!(sewing.contains(&"recurring_problems"));
    assert!(!sewing.contains(&"concentration_alert"));
}

#[test]
fn test_role_cap_applied() {
    let mut config = ThresholdConfig::default();
    config.attention_repair_rate = 1.0;
    let mut s = summary(100, 20, 10);
    s.ncr_count = 2;
    s.red_flag_count = 1;
    s.pct_caught_at_sewing = Rate::percent(5, 20);
    let comparison = PeriodComparison {
        current_months: vec![],
        prior_months: vec![],
        current: s.clone(),
        prior: summary(100, 1, 0),
    };
    let ctx = InsightContext::new(&s, &config).with_comparison(Some(&comparison));
    for role in Role::ALL {
        let bullets = InsightEngine::new().evaluate(role, &ctx, "en");
        assert!(bullets.len() <= role.insight_cap());
    }
}

#[test]
fn test_on_time_leads_production_view_under_cap() {
    let mut config = ThresholdConfig::default();
    config.attention_repair_rate = 1.0;
    let mut s = summary(100, 20, 10);
    s.ncr_count = 2;
    s.pct_caught_at_sewing = Rate::percent(5, 20);
    let comparison = PeriodComparison {
        current_months: vec![],
        prior_months: vec![],
        current: s.clone(),
        prior: summary(100, 1, 0),
    };
    let on_time = OnTimeSummary {
        orders_evaluated: 10,
        late_orders: 2,
        on_time_rate: Rate::percent(80, 100),
        ..Default::default()
    };
    let ctx = InsightContext::new(&s, &config)
        .with_on_time(&on_time)
        .with_comparison(Some(&comparison));
    let bullets = InsightEngine::new().evaluate(Role::ProductionManager, &ctx, "en");

    assert_eq!(bullets.len(), Role::ProductionManager.insight_cap());
    assert_eq!(bullets[0].rule_id, "on_time_below_target");
    assert_eq!(bullets[0].severity, Severity::Warning);
    assert!(!ids(&bullets).contains(&"scrap_rate_worsened"));
}

#[test]
fn test_localized_text() {
    let config = ThresholdConfig::default();
    let s = summary(100, 3, 0);
    let ctx = InsightContext::new(&s, &config);
    let bullets = InsightEngine::new().evaluate(Role::ProductionManager, &ctx, "zh-CN");
    let scrap = bullets
        .iter()
        .find(|b| b.rule_id == "scrap_rate_elevated")
        .unwrap();
    assert!(scrap.text.contains("报废率"));
    assert!(scrap.text.contains("3.0%"));
}
