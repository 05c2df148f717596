// ==========================================
// ONE Tracker 质检分析引擎 - SKU 目录配置
// ==========================================
// 职责: 颜色代码集合 + 例外 SKU 集合
// 启动时构建一次，以引用传入解析器；匹配逻辑中不出现字面量
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 颜色代码（CR 不是颜色代码，是产品线前缀）
pub const DEFAULT_COLOR_CODES: [&str; 17] = [
    "BK", "CB", "MC", "MA", "MB", "MT", "RG", "WD", "WG", "TB", "TD", "TJ", "RD", "ML", "NG", "NP",
    "RT",
];

/// 形似颜色代码、实为产品名一部分的 SKU
pub const DEFAULT_EXCEPTIONS: [&str; 3] = ["PI-CB", "MI-556-TR", "MI-556-SN"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkuCatalog {
    pub color_codes: BTreeSet<String>,
    pub exceptions: BTreeSet<String>,
    pub separator: char,
}

impl Default for SkuCatalog {
    fn default() -> Self {
        Self {
            color_codes: DEFAULT_COLOR_CODES.iter().map(|s| s.to_string()).collect(),
            exceptions: DEFAULT_EXCEPTIONS.iter().map(|s| s.to_string()).collect(),
            separator: '-',
        }
    }
}

impl SkuCatalog {
    pub fn is_color_code(&self, token: &str) -> bool {
        self.color_codes.contains(token)
    }

    pub fn is_exception(&self, sku: &str) -> bool {
        self.exceptions.contains(sku)
    }
}
