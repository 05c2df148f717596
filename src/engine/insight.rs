// ==========================================
// ONE Tracker 质检分析引擎 - 洞察规则引擎
// ==========================================
// 职责: 按角色评估固定顺序的声明式规则表，生成洞察条目
// 输入: 指标汇总 + 集中度/复发/环比结果 + 阈值配置
// 输出: 有序洞察条目（按角色上限截断）
// ==========================================
// 红线: 规则之间相互独立，单条规则不触发不影响其他规则
// 红线: 需要上期数据的规则在无上期时跳过，不报错
// ==========================================

mod core;
mod rules;

#[cfg(test)]
mod tests;

pub use self::core::{InsightContext, InsightEngine};
pub use rules::{rules_for, InsightRule, RuleSeverity, RULES};
