// ==========================================
// InsightEngine 集成测试
// ==========================================
// 测试目标: 从检验记录到洞察条目的完整链路
// ==========================================


use one_tracker_qc::config::ThresholdConfig;
use one_tracker_qc::engine::{GroupBy, InsightContext, InsightEngine, MetricAggregator};
use one_tracker_qc::{Role, Severity};
use test_helpers::RowBuilder;

#[test]
fn test_ninety_nine_percent_pass_single_positive() {
    let rows = vec![RowBuilder::new("SO-1", "AC-ESE-BK")
        .quantity(1000)
        .scrap(10)
        .build()];
    let config = ThresholdConfig::default();
    let summary = MetricAggregator::new().summarize(&rows);
    let ctx = InsightContext::new(&summary, &config);

    let bullets = InsightEngine::new().evaluate(Role::ProductionManager, &ctx, "en");

    assert_eq!(
        bullets.iter().filter(|b| b.severity == Severity::Positive).count(),
        1
    );
    assert!(bullets.iter().all(|b| b.severity != Severity::Warning));
    assert!(bullets.iter().all(|b| b.severity != Severity::Critical));
}

#[test]
fn test_elevated_scrap_interpolates_literal_value() {
    let rows = vec![RowBuilder::new("SO-1", "AC-ESE-BK")
        .quantity(100)
        .scrap(3)
        .build()];
    let config = ThresholdConfig::default();
    let summary = MetricAggregator::new().summarize(&rows);
    let ctx = InsightContext::new(&summary, &config);

    for locale in ["en", "zh-CN"] {
        let bullets = InsightEngine::new().evaluate(Role::OperationsDirector, &ctx, locale);
        let scrap = bullets
            .iter()
            .find(|b| b.rule_id == "scrap_rate_elevated")
            .unwrap();
        assert!(scrap.text.contains("3.0%"), "{}: {}", locale, scrap.text);
        assert!(!scrap.text.contains("%{"));
    }
}

#[test]
fn test_unstable_sku_count_uses_min_units_floor() {
    let rows = vec![
        RowBuilder::new("SO-1", "AC-ESE-BK")
            .quantity(100)
            .scrap(10)
            .build(),
        RowBuilder::new("SO-2", "AC-HK")
            .quantity(5)
            .scrap(5)
            .build(),
        RowBuilder::new("SO-3", "PI-CB").quantity(100).build(),
    ];
    let config = ThresholdConfig::default();
    let aggregator = MetricAggregator::new();
    let summary = aggregator.summarize(&rows);
    let by_sku = aggregator.aggregate_by(&rows, GroupBy::ParentSku);
    let ctx = InsightContext::new(&summary, &config).with_sku_summaries(&by_sku);

    assert_eq!(ctx.unstable_sku_count(), 1);
    let bullets = InsightEngine::new().evaluate(Role::QcManager, &ctx, "en");
    assert!(bullets.iter().any(|b| b.rule_id == "unstable_skus"));
}

#[test]
fn test_bullet_count_capped_per_role() {
    let rows = vec![
        RowBuilder::new("SO-1", "AC-ESE-BK")
            .quantity(100)
            .scrap(20)
            .repairs(20)
            .captured(2, 18)
            .ncr()
            .red_flag()
            .build(),
        RowBuilder::new("SO-2", "AC-HK")
            .quantity(100)
            .scrap(20)
            .captured(2, 18)
            .build(),
    ];
    let config = ThresholdConfig::default();
    let aggregator = MetricAggregator::new();
    let summary = aggregator.summarize(&rows);
    let by_sku = aggregator.aggregate_by(&rows, GroupBy::ParentSku);
    let ctx = InsightContext::new(&summary, &config).with_sku_summaries(&by_sku);

    for role in Role::ALL {
        let bullets = InsightEngine::new().evaluate(role, &ctx, "en");
        assert!(bullets.len() <= role.insight_cap());
        assert!(bullets.len() <= 6);
    }
}
