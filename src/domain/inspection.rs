// ==========================================
// ONE Tracker 质检分析引擎 - 检验记录领域模型
// ==========================================
// 职责: 检验记录（InspectionRow）、原始记录、剔除记录、数据集
// 红线: 记录入集后只读，引擎不得原地修改
// ==========================================

use crate::domain::types::MonthKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// InspectionRow - 检验记录（SS 流）
// ==========================================
// 不变式: scrap <= quantity, repairs <= quantity, final_qty = quantity - scrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRow {
    pub order_number: String,
    pub lot_number: String,
    pub due_date: Option<NaiveDate>,
    pub finished_date: NaiveDate,
    pub sku: String,
    pub parent_sku: String,
    pub quantity: u32,
    pub repairs: u32,
    pub scrap: u32,
    pub final_qty: u32,
    pub inspector: String,
    pub red_flag: bool,
    pub ncr: bool,
    pub qc_fail: u32,
    pub sewing_fail: u32,
}

impl InspectionRow {
    /// 完工月份
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.finished_date)
    }

    /// 返修 + 报废（触碰件数）
    pub fn touch_units(&self) -> u32 {
        self.repairs + self.scrap
    }

    /// 是否按期完工（无交期时为 None）
    pub fn finished_on_time(&self) -> Option<bool> {
        self.due_date.map(|due| self.finished_date <= due)
    }

    /// 延期天数（未延期为 0，无交期为 None）
    pub fn days_late(&self) -> Option<i64> {
        self.due_date
            .map(|due| (self.finished_date - due).num_days().max(0))
    }
}

// ==========================================
// RawInspectionRecord - 字段映射后的原始记录
// ==========================================
// 所有字段均可缺失，由校验器决定接收或剔除
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInspectionRecord {
    pub order_number: Option<String>,
    pub lot_number: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub finished_date: Option<NaiveDate>,
    pub sku: Option<String>,
    pub quantity: Option<i64>,
    pub repairs: Option<i64>,
    pub scrap: Option<i64>,
    pub final_qty: Option<i64>,
    pub inspector: Option<String>,
    pub red_flag: bool,
    pub ncr: bool,
    pub qc_fail: Option<i64>,
    pub sewing_fail: Option<i64>,
    pub stream: Option<String>,

    // 元信息
    pub sheet: Option<String>,
    pub row_number: usize,
}

// ==========================================
// 剔除记录 (RowRejection)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionKind {
    MissingRequiredField,  // 必填字段缺失
    InvalidValue,          // 值无法解析或为负
    InconsistentQuantities, // 报废/返修超过检验数量
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionKind::MissingRequiredField => write!(f, "MISSING_REQUIRED_FIELD"),
            RejectionKind::InvalidValue => write!(f, "INVALID_VALUE"),
            RejectionKind::InconsistentQuantities => write!(f, "INCONSISTENT_QUANTITIES"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRejection {
    pub row_number: usize,
    pub sheet: Option<String>,
    pub kind: RejectionKind,
    pub field: String,
    pub detail: String,
}

// ==========================================
// InspectionDataset - 一次分析的只读数据快照
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectionDataset {
    pub rows: Vec<InspectionRow>,
    pub rejections: Vec<RowRejection>,
    /// 非 SS 流被上游排除的行数（不计入剔除）
    pub excluded_other_stream: usize,
}

impl InspectionDataset {
    pub fn from_rows(rows: Vec<InspectionRow>) -> Self {
        Self {
            rows,
            rejections: Vec::new(),
            excluded_other_stream: 0,
        }
    }

    /// 数据中出现的月份（升序去重）
    pub fn months(&self) -> Vec<MonthKey> {
        self.rows
            .iter()
            .map(InspectionRow::month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 指定月份集合内的记录
    pub fn rows_in<'a>(&'a self, months: &'a [MonthKey]) -> impl Iterator<Item = &'a InspectionRow> + 'a {
        self.rows
            .iter()
            .filter(move |row| months.contains(&row.month()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(finished: NaiveDate, due: Option<NaiveDate>) -> InspectionRow {
        InspectionRow {
            order_number: "SO-1".to_string(),
            lot_number: "L1".to_string(),
            due_date: due,
            finished_date: finished,
            sku: "AC-ESE-BK".to_string(),
            parent_sku: "AC-ESE".to_string(),
            quantity: 10,
            repairs: 1,
            scrap: 2,
            final_qty: 8,
            inspector: "ANA".to_string(),
            red_flag: false,
            ncr: false,
            qc_fail: 1,
            sewing_fail: 1,
        }
    }

    #[test]
    fn test_days_late_and_on_time() {
        let finished = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        let early_due = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let late_due = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();

        let late = sample_row(finished, Some(early_due));
        assert_eq!(late.finished_on_time(), Some(false));
        assert_eq!(late.days_late(), Some(5));

        let on_time = sample_row(finished, Some(late_due));
        assert_eq!(on_time.finished_on_time(), Some(true));
        assert_eq!(on_time.days_late(), Some(0));

        let no_due = sample_row(finished, None);
        assert_eq!(no_due.finished_on_time(), None);
        assert_eq!(no_due.touch_units(), 3);
    }

    #[test]
    fn test_dataset_months_sorted_distinct() {
        let dataset = InspectionDataset::from_rows(vec![
            sample_row(NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(), None),
            sample_row(NaiveDate::from_ymd_opt(2025, 12, 9).unwrap(), None),
            sample_row(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(), None),
        ]);
        let months = dataset.months();
        assert_eq!(
            months,
            vec![
                MonthKey::new(2025, 12).unwrap(),
                MonthKey::new(2026, 2).unwrap()
            ]
        );
        let feb = [MonthKey::new(2026, 2).unwrap()];
        assert_eq!(dataset.rows_in(&feb).count(), 2);
    }
}
