// ==========================================
// ONE Tracker 质检分析引擎 - 阈值配置
// ==========================================
// 红线: 阈值作为显式参数传入每个组件，不读取全局状态
// 同一会话中不同角色可使用不同配置，互不干扰
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 阈值配置（所有比率阈值单位为 %，集中度阈值为 0~1 比例）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// 比率排名表的最小检验件数
    pub min_units_for_rate_tables: u64,
    pub attention_fail_rate: f64,
    pub attention_repair_rate: f64,
    pub attention_scrap_rate: f64,
    /// 按期交付目标
    pub on_time_target_pct: f64,

    // 集中度
    pub concentration_threshold: f64,
    pub concentration_min_orders: u64,

    // 复发
    pub recurrence_window_months: usize,
    pub recurrence_min_occurrences: usize,
    pub recurrence_top_n: usize,

    // 洞察分档
    pub excellent_pass_rate: f64,
    pub watch_pass_rate: f64,
    pub good_sewing_capture: f64,
    pub fair_sewing_capture: f64,

    /// 缝制+质检拦截与报废的允许偏差（占报废 %）
    pub capture_tolerance_pct: f64,
    /// 排名表最大行数
    pub top_table_rows: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_units_for_rate_tables: 10,
            attention_fail_rate: 5.0,
            attention_repair_rate: 5.0,
            attention_scrap_rate: 2.0,
            on_time_target_pct: 97.0,
            concentration_threshold: 0.5,
            concentration_min_orders: 10,
            recurrence_window_months: 6,
            recurrence_min_occurrences: 3,
            recurrence_top_n: 5,
            excellent_pass_rate: 98.0,
            watch_pass_rate: 95.0,
            good_sewing_capture: 70.0,
            fair_sewing_capture: 50.0,
            capture_tolerance_pct: 10.0,
            top_table_rows: 10,
        }
    }
}

impl ThresholdConfig {
    /// 校验配置取值范围
    pub fn validate(&self) -> ConfigResult<()> {
        let percentages = [
            ("attention_fail_rate", self.attention_fail_rate),
            ("attention_repair_rate", self.attention_repair_rate),
            ("attention_scrap_rate", self.attention_scrap_rate),
            ("on_time_target_pct", self.on_time_target_pct),
            ("excellent_pass_rate", self.excellent_pass_rate),
            ("watch_pass_rate", self.watch_pass_rate),
            ("good_sewing_capture", self.good_sewing_capture),
            ("fair_sewing_capture", self.fair_sewing_capture),
            ("capture_tolerance_pct", self.capture_tolerance_pct),
        ];
        for (key, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    key,
                    value: value.to_string(),
                    expected: "0 ~ 100",
                });
            }
        }

        if !(self.concentration_threshold > 0.0 && self.concentration_threshold <= 1.0) {
            return Err(ConfigError::OutOfRange {
                key: "concentration_threshold",
                value: self.concentration_threshold.to_string(),
                expected: "(0, 1]",
            });
        }

        let counts = [
            ("recurrence_window_months", self.recurrence_window_months),
            ("recurrence_min_occurrences", self.recurrence_min_occurrences),
            ("recurrence_top_n", self.recurrence_top_n),
            ("top_table_rows", self.top_table_rows),
        ];
        for (key, value) in counts {
            if value == 0 {
                return Err(ConfigError::OutOfRange {
                    key,
                    value: value.to_string(),
                    expected: ">= 1",
                });
            }
        }

        if self.watch_pass_rate > self.excellent_pass_rate {
            return Err(ConfigError::OutOfRange {
                key: "watch_pass_rate",
                value: self.watch_pass_rate.to_string(),
                expected: "<= excellent_pass_rate",
            });
        }
        if self.fair_sewing_capture > self.good_sewing_capture {
            return Err(ConfigError::OutOfRange {
                key: "fair_sewing_capture",
                value: self.fair_sewing_capture.to_string(),
                expected: "<= good_sewing_capture",
            });
        }

        Ok(())
    }
}
