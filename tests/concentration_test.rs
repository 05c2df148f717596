// ==========================================
// ConcentrationAnalyzer 集成测试
// ==========================================
// 测试目标: 订单门槛、占比阈值、排除名单
// ==========================================


use one_tracker_qc::config::{InspectorRoster, ThresholdConfig};
use one_tracker_qc::engine::ConcentrationAnalyzer;
use test_helpers::orders_for;

#[test]
fn test_twelve_orders_seven_by_one_inspector_flagged() {
    let mut rows = orders_for("A", "AC-ESE-BK", "ANA", 7);
    rows.extend(orders_for("B", "AC-ESE-MC", "BEN", 5));

    let flags = ConcentrationAnalyzer::new().find_concentration(
        &rows,
        &ThresholdConfig::default(),
        &InspectorRoster::default(),
    );

    assert_eq!(flags.len(), 1);
    let flag = &flags[0];
    assert_eq!(flag.parent_sku, "AC-ESE");
    assert_eq!(flag.inspector, "ANA");
    assert_eq!(flag.inspector_orders, 7);
    assert_eq!(flag.total_orders_for_sku, 12);
    assert!((flag.share_pct() - 7.0 / 12.0 * 100.0).abs() < 1e-9);
}

#[test]
fn test_below_min_orders_not_flagged_even_at_full_share() {
    let rows = orders_for("A", "AC-ESE-BK", "ANA", 8);

    let flags = ConcentrationAnalyzer::new().find_concentration(
        &rows,
        &ThresholdConfig::default(),
        &InspectorRoster::default(),
    );
    assert!(flags.is_empty());
}

#[test]
fn test_threshold_and_min_orders_are_configurable() {
    let rows = orders_for("A", "AC-ESE-BK", "ANA", 8);
    let config = ThresholdConfig {
        concentration_min_orders: 5,
        ..Default::default()
    };
    let flags = ConcentrationAnalyzer::new().find_concentration(
        &rows,
        &config,
        &InspectorRoster::default(),
    );
    assert_eq!(flags.len(), 1);

    let mut rows = orders_for("A", "AC-ESE-BK", "ANA", 7);
    rows.extend(orders_for("B", "AC-ESE-BK", "BEN", 5));
    let strict = ThresholdConfig {
        concentration_threshold: 0.6,
        ..Default::default()
    };
    let flags = ConcentrationAnalyzer::new().find_concentration(
        &rows,
        &strict,
        &InspectorRoster::default(),
    );
    assert!(flags.is_empty());
}

#[test]
fn test_excluded_station_never_flagged() {
    let rows = orders_for("A", "AC-ESE-BK", "PA/SEWING ASST", 12);

    let flags = ConcentrationAnalyzer::new().find_concentration(
        &rows,
        &ThresholdConfig::default(),
        &InspectorRoster::default(),
    );
    assert!(flags.is_empty());
}

#[test]
fn test_configured_line_specialist_suppresses_flag() {
    let mut rows = orders_for("A", "PC-F20-BK-LG", "LINE SPECIALIST", 9);
    rows.extend(orders_for("B", "PC-F20-MC-LG", "BEN", 3));
    let config = ThresholdConfig::default();

    let flags = ConcentrationAnalyzer::new().find_concentration(
        &rows,
        &config,
        &InspectorRoster::default(),
    );
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].inspector, "LINE SPECIALIST");

    let mut roster = InspectorRoster::default();
    roster
        .concentration_excluded
        .insert("Line Specialist".to_string());
    let flags = ConcentrationAnalyzer::new().find_concentration(
        &rows,
        &config,
        &roster,
    );
    assert!(flags.is_empty());
    assert!(roster.is_concentration_excluded("PA/SEWING ASST"));
}
