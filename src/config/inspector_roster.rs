// ==========================================
// ONE Tracker 质检分析引擎 - 检验员名册配置
// ==========================================
// 集中度排除名单 / 仅供参考岗位 / 已离职检验员
// 名称比较均忽略首尾空白与大小写
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorRoster {
    /// 不参与集中度告警的检验员（通用岗 / 专线岗）
    ///
    /// 默认只含通用岗 `PA/SEWING ASST`；专线检验员（只负责单一产品线）因部署而异，
    /// 在配置档中补充，见 `demos/analysis_profile.example.json`
    pub concentration_excluded: BTreeSet<String>,
    /// 仅供参考的岗位（子串匹配），不参与绩效对比
    pub reference_only_patterns: Vec<String>,
    /// 已离职检验员，不参与绩效对比
    pub former_inspectors: BTreeSet<String>,
}

impl Default for InspectorRoster {
    fn default() -> Self {
        Self {
            concentration_excluded: ["PA/SEWING ASST".to_string()].into_iter().collect(),
            reference_only_patterns: vec!["PA/SEWING".to_string()],
            former_inspectors: BTreeSet::new(),
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl InspectorRoster {
    pub fn is_concentration_excluded(&self, inspector: &str) -> bool {
        self.concentration_excluded
            .iter()
            .any(|name| same_name(name, inspector))
    }

    pub fn is_reference_only(&self, inspector: &str) -> bool {
        let upper = inspector.trim().to_uppercase();
        self.reference_only_patterns
            .iter()
            .any(|pattern| upper.contains(&pattern.trim().to_uppercase()))
    }

    pub fn is_former(&self, inspector: &str) -> bool {
        self.former_inspectors
            .iter()
            .any(|name| same_name(name, inspector))
    }

    /// 是否纳入检验员绩效对比
    pub fn is_comparable(&self, inspector: &str) -> bool {
        !self.is_reference_only(inspector) && !self.is_former(inspector)
    }
}
