// ==========================================
// MetricAggregator 集成测试
// ==========================================
// 测试目标: 件数加权比率、未定义比率、分组与排名
// ==========================================


use one_tracker_qc::config::ThresholdConfig;
use one_tracker_qc::engine::{GroupBy, GroupKey, MetricAggregator, RankBy, RankOptions};
use one_tracker_qc::{InspectionRow, MonthKey, Rate};
use test_helpers::{date, RowBuilder};

fn assert_close(rate: Rate, expected: f64) {
    let value = rate.value().expect("比率应已定义");
    assert!((value - expected).abs() < 1e-9, "{} != {}", value, expected);
}

#[test]
fn test_unit_weighted_rates() {
    let rows = vec![
        RowBuilder::new("SO-1", "AC-ESE-BK")
            .quantity(100)
            .scrap(5)
            .repairs(2)
            .build(),
        RowBuilder::new("SO-2", "AC-ESE-MC")
            .quantity(50)
            .repairs(1)
            .build(),
    ];
    let summary = MetricAggregator::new().summarize(&rows);

    assert_eq!(summary.inspected, 150);
    assert_close(summary.scrap_rate, 5.0 / 150.0 * 100.0);
    assert_close(summary.repair_rate, 2.0);
    assert_eq!(summary.scrap_rate.to_string(), "3.3%");
    assert_eq!(summary.orders_count, 2);
}

#[test]
fn test_pass_plus_fail_is_hundred() {
    let cases: [&[(u32, u32)]; 4] = [
        &[(100, 5), (50, 0)],
        &[(7, 7)],
        &[(1, 0), (3, 1), (999, 13)],
        &[(10, 0)],
    ];
    for rows in cases {
        let rows: Vec<_> = rows
            .iter()
            .enumerate()
            .map(|(i, (qty, scrap))| {
                RowBuilder::new(&format!("SO-{}", i), "AC-HK")
                    .quantity(*qty)
                    .scrap(*scrap)
                    .build()
            })
            .collect();
        let s = MetricAggregator::new().summarize(&rows);
        let total = s.pass_rate.value().unwrap() + s.fail_rate.value().unwrap();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(s.fail_rate, s.scrap_rate);
    }
}

#[test]
fn test_empty_group_rates_undefined() {
    let rows: Vec<InspectionRow> = Vec::new();
    let summary = MetricAggregator::new().summarize(&rows);

    assert_eq!(summary.inspected, 0);
    assert!(!summary.pass_rate.is_defined());
    assert!(!summary.scrap_rate.is_defined());
    assert!(!summary.pct_caught_at_sewing.is_defined());
    assert_eq!(summary.pass_rate.to_string(), "N/A");
    assert_eq!(serde_json::to_value(summary.pass_rate).unwrap(), serde_json::Value::Null);
}

#[test]
fn test_capture_approximation_is_signal_not_error() {
    let config = ThresholdConfig::default();
    let rows = vec![
        RowBuilder::new("SO-1", "AC-ESE-BK")
            .scrap(10)
            .captured(6, 3)
            .build(),
        RowBuilder::new("SO-2", "PC-F20-BK-LG")
            .scrap(10)
            .captured(2, 2)
            .build(),
    ];
    let by_sku = MetricAggregator::new().aggregate_by(&rows, GroupBy::ParentSku);

    let close = &by_sku[&GroupKey::Text("AC-ESE".to_string())];
    assert_eq!(close.capture_divergence(), 1);
    assert!(close.capture_within_tolerance(config.capture_tolerance_pct));

    let divergent = &by_sku[&GroupKey::Text("PC-F20-LG".to_string())];
    assert_eq!(divergent.capture_divergence(), 6);
    assert!(!divergent.capture_within_tolerance(config.capture_tolerance_pct));
}

#[test]
fn test_rate_ranking_respects_min_units() {
    let rows = vec![
        RowBuilder::new("SO-1", "AC-ESE-BK")
            .quantity(4)
            .scrap(2)
            .build(),
        RowBuilder::new("SO-2", "AC-HK")
            .quantity(100)
            .scrap(10)
            .build(),
        RowBuilder::new("SO-3", "PI-CB")
            .quantity(100)
            .scrap(1)
            .build(),
    ];
    let aggregator = MetricAggregator::new();
    let by_sku = aggregator.aggregate_by(&rows, GroupBy::ParentSku);

    let ranked = aggregator.rank(
        &by_sku,
        RankBy::FailRate,
        RankOptions {
            min_units: Some(10),
            ..Default::default()
        },
    );
    let keys: Vec<String> = ranked.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, vec!["AC-HK", "PI-CB"]);

    // 件数排名不受门槛影响
    let ranked = aggregator.rank(&by_sku, RankBy::ScrapTotal, RankOptions::default());
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].0.to_string(), "AC-HK");
}

#[test]
fn test_group_by_day_and_month() {
    let rows = vec![
        RowBuilder::new("SO-1", "AC-HK")
            .finished(2026, 1, 10)
            .scrap(4)
            .build(),
        RowBuilder::new("SO-2", "AC-HK")
            .finished(2026, 1, 10)
            .repairs(5)
            .build(),
        RowBuilder::new("SO-3", "AC-HK")
            .finished(2026, 1, 20)
            .quantity(50)
            .scrap(5)
            .build(),
        RowBuilder::new("SO-4", "AC-HK")
            .finished(2026, 2, 3)
            .quantity(200)
            .scrap(2)
            .build(),
    ];
    let aggregator = MetricAggregator::new();

    let by_day = aggregator.aggregate_by(&rows, GroupBy::Day);
    let days: Vec<&GroupKey> = by_day.keys().collect();
    assert_eq!(
        days,
        vec![
            &GroupKey::Day(date(2026, 1, 10)),
            &GroupKey::Day(date(2026, 1, 20)),
            &GroupKey::Day(date(2026, 2, 3)),
        ]
    );
    let jan_10 = &by_day[&GroupKey::Day(date(2026, 1, 10))];
    assert_eq!(jan_10.inspected, 200);
    assert_close(jan_10.scrap_rate, 2.0);
    assert_close(jan_10.repair_rate, 2.5);
    assert_close(by_day[&GroupKey::Day(date(2026, 1, 20))].scrap_rate, 10.0);

    let by_month = aggregator.aggregate_by(&rows, GroupBy::Month);
    assert_eq!(by_month.len(), 2);
    let jan = &by_month[&GroupKey::Month(MonthKey::new(2026, 1).unwrap())];
    assert_eq!(jan.inspected, 250);
    assert_close(jan.scrap_rate, 9.0 / 250.0 * 100.0);
    let feb = &by_month[&GroupKey::Month(MonthKey::new(2026, 2).unwrap())];
    assert_eq!(feb.inspected, 200);
    assert_close(feb.scrap_rate, 1.0);
    assert_eq!(
        GroupKey::Month(MonthKey::new(2026, 2).unwrap()).to_string(),
        MonthKey::new(2026, 2).unwrap().to_string()
    );
}

#[test]
fn test_color_variants_split_by_sku_merge_by_parent() {
    let rows = vec![
        RowBuilder::new("SO-1", "AC-ESE-BK").scrap(3).build(),
        RowBuilder::new("SO-2", "AC-ESE-MC").scrap(1).build(),
    ];
    let aggregator = MetricAggregator::new();

    let by_sku = aggregator.aggregate_by(&rows, GroupBy::Sku);
    assert_eq!(by_sku.len(), 2);
    assert_close(by_sku[&GroupKey::Text("AC-ESE-BK".to_string())].scrap_rate, 3.0);
    assert_close(by_sku[&GroupKey::Text("AC-ESE-MC".to_string())].scrap_rate, 1.0);

    let by_parent = aggregator.aggregate_by(&rows, GroupBy::ParentSku);
    assert_eq!(by_parent.len(), 1);
    let merged = &by_parent[&GroupKey::Text("AC-ESE".to_string())];
    assert_eq!(merged.inspected, 200);
    assert_eq!(merged.orders_count, 2);
    assert_close(merged.scrap_rate, 2.0);
}
