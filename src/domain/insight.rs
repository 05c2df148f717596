// ==========================================
// ONE Tracker 质检分析引擎 - 洞察条目
// ==========================================

use crate::domain::types::Severity;
use serde::Serialize;

/// 自动生成的洞察条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightBullet {
    pub severity: Severity,
    /// 渲染后的文案
    pub text: String,
    /// 触发规则 ID
    pub rule_id: &'static str,
}
