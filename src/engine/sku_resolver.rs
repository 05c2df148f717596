// ==========================================
// ONE Tracker 质检分析引擎 - 父 SKU 解析器
// ==========================================
// 规则:
// 1) 整个 SKU 命中例外集合 → 原样返回（先于分词判断）
// 2) 按分隔符分词，剔除所有与颜色代码完全相等的 token
// 3) 其余 token（含尺码）保持原顺序，用同一分隔符拼回
// 红线: 尽力而为，畸形输入原样返回，永不报错
// ==========================================

use crate::config::SkuCatalog;

// ==========================================
// SkuResolver - 父 SKU 解析器
// ==========================================
pub struct SkuResolver<'a> {
    catalog: &'a SkuCatalog,
}

impl<'a> SkuResolver<'a> {
    pub fn new(catalog: &'a SkuCatalog) -> Self {
        Self { catalog }
    }

    /// SKU → 父 SKU
    ///
    /// # 示例
    /// - AC-ESE-BK → AC-ESE（去颜色）
    /// - PC-F20-BK-LG → PC-F20-LG（去颜色，保留尺码）
    /// - PI-CB → PI-CB（例外）
    /// - AC-HK → AC-HK（无颜色代码）
    pub fn resolve(&self, sku: &str) -> String {
        let sku = sku.trim();
        if sku.is_empty() || self.catalog.is_exception(sku) {
            return sku.to_string();
        }

        let separator = self.catalog.separator;
        let kept: Vec<&str> = sku
            .split(separator)
            .filter(|token| !self.catalog.is_color_code(token))
            .collect();

        // 全部 token 都是颜色代码时无可保留，原样返回
        if kept.is_empty() {
            return sku.to_string();
        }

        kept.join(&separator.to_string())
    }

    /// 提取第一个颜色代码（例外 SKU 返回 None）
    pub fn color_of(&self, sku: &str) -> Option<String> {
        let sku = sku.trim();
        if self.catalog.is_exception(sku) {
            return None;
        }
        sku.split(self.catalog.separator)
            .find(|token| self.catalog.is_color_code(token))
            .map(str::to_string)
    }
}
