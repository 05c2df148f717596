// ==========================================
// ONE Tracker 质检分析引擎 - 检验员集中度分析
// ==========================================
// 规则:
// - 只分析总订单数 >= concentration_min_orders 的父 SKU
// - 检验员件数占比 >= concentration_threshold 即告警（含等于）
// - 名册中的排除名单不参与告警
// ==========================================

use crate::config::{InspectorRoster, ThresholdConfig};
use crate::domain::flags::ConcentrationFlag;
use crate::domain::inspection::InspectionRow;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

#[derive(Default)]
struct Tally<'a> {
    units: u64,
    orders: BTreeSet<&'a str>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, row: &'a InspectionRow) {
        self.units += u64::from(row.quantity);
        self.orders.insert(row.order_number.as_str());
    }
}

#[derive(Default)]
struct SkuVolume<'a> {
    total: Tally<'a>,
    by_inspector: BTreeMap<&'a str, Tally<'a>>,
}

// ==========================================
// ConcentrationAnalyzer - 集中度分析器
// ==========================================
#[derive(Debug, Default)]
pub struct ConcentrationAnalyzer;

impl ConcentrationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// 查找集中度告警
    ///
    /// 结果按占比降序，其次父 SKU、检验员升序
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn find_concentration(
        &self,
        rows: &[InspectionRow],
        config: &ThresholdConfig,
        roster: &InspectorRoster,
    ) -> Vec<ConcentrationFlag> {
        let mut by_sku: BTreeMap<&str, SkuVolume> = BTreeMap::new();
        for row in rows {
            let volume = by_sku.entry(row.parent_sku.as_str()).or_default();
            volume.total.add(row);
            volume
                .by_inspector
                .entry(row.inspector.as_str())
                .or_default()
                .add(row);
        }

        let mut flags = Vec::new();
        for (parent_sku, volume) in &by_sku {
            let total_orders = volume.total.orders.len() as u64;
            if total_orders < config.concentration_min_orders || volume.total.units == 0 {
                continue;
            }

            for (inspector, tally) in &volume.by_inspector {
                if roster.is_concentration_excluded(inspector) {
                    continue;
                }
                let share = tally.units as f64 / volume.total.units as f64;
                if share >= config.concentration_threshold {
                    flags.push(ConcentrationFlag {
                        parent_sku: parent_sku.to_string(),
                        inspector: inspector.to_string(),
                        share_of_volume: share,
                        inspector_units: tally.units,
                        sku_units: volume.total.units,
                        inspector_orders: tally.orders.len() as u64,
                        total_orders_for_sku: total_orders,
                    });
                }
            }
        }

        flags.sort_by(|a, b| {
            b.share_of_volume
                .total_cmp(&a.share_of_volume)
                .then_with(|| a.parent_sku.cmp(&b.parent_sku))
                .then_with(|| a.inspector.cmp(&b.inspector))
        });

        debug!(skus = by_sku.len(), flags = flags.len(), "集中度分析完成");
        flags
    }
}
