// ==========================================
// ONE Tracker 质检分析引擎 - 角色视图载荷
// ==========================================
// 职责: 角色视图输出结构（卡片 / 表格 / 洞察 / 数据质量）
// 红线: 未定义比率以 null / N/A 呈现，不得显示为 0%
// ==========================================

use crate::domain::inspection::RejectionKind;
use crate::domain::insight::InsightBullet;
use crate::domain::types::{MonthKey, Rate, Role};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// 指标卡片
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub id: &'static str,
    pub label: String,
    pub value: CardValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CardValue {
    Count(u64),
    Rate(Rate),
    Days(Option<f64>),
}

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardValue::Count(n) => write!(f, "{}", n),
            CardValue::Rate(rate) => write!(f, "{}", rate),
            CardValue::Days(Some(days)) => write!(f, "{:.1}", days),
            CardValue::Days(None) => write!(f, "N/A"),
        }
    }
}

// ==========================================
// 表格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewTable {
    pub id: &'static str,
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ViewTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按列 ID 顺序取某列的文本（测试/调试用）
    pub fn column_text(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index).map(|cell| cell.to_string()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Count(u64),
    Rate(Rate),
    Flag(bool),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Count(n) => write!(f, "{}", n),
            Cell::Rate(rate) => write!(f, "{}", rate),
            Cell::Flag(true) => write!(f, "X"),
            Cell::Flag(false) => Ok(()),
        }
    }
}

// ==========================================
// 数据质量摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DataQualitySummary {
    pub rows_analyzed: usize,
    pub rows_rejected: usize,
    pub rejections_by_kind: BTreeMap<RejectionKind, usize>,
    pub excluded_other_stream: usize,
    /// 无交期、未参与按期率计算的订单数
    pub orders_missing_due_date: u64,
    /// 拦截数与报废数偏差超出容差的父 SKU
    pub capture_divergent_skus: Vec<String>,
}

// ==========================================
// RoleViewPayload - 角色视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleViewPayload {
    pub role: Role,
    pub title: String,
    pub period: Vec<MonthKey>,
    pub cards: Vec<MetricCard>,
    pub tables: Vec<ViewTable>,
    pub insights: Vec<InsightBullet>,
    pub data_quality: DataQualitySummary,
}

impl RoleViewPayload {
    pub fn card(&self, id: &str) -> Option<&MetricCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn table(&self, id: &str) -> Option<&ViewTable> {
        self.tables.iter().find(|t| t.id == id)
    }
}
