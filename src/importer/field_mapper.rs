// ==========================================
// ONE Tracker 质检分析引擎 - 字段映射器实现
// ==========================================
// 职责: 源字段 → 标准字段映射 + 类型转换
// 列名匹配忽略大小写、空格、下划线与标点（Order_Number = order number）
// 红线: 只做类型转换，不做业务判断（必填/一致性由校验器负责）
// ==========================================

use crate::domain::inspection::RawInspectionRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::SourceRecord;
use crate::importer::inspection_importer_trait::FieldMapper as FieldMapperTrait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// 标准字段及其列名别名（已归一化）
const ALIASES: &[(&str, &[&str])] = &[
    ("order_number", &["ordernumber", "order", "orderno", "workorder", "wo"]),
    ("lot_number", &["lotnumber", "lot", "lotno"]),
    ("due_date", &["duedate", "due"]),
    ("finished_date", &["finisheddate", "finishdate", "finished", "completeddate"]),
    ("sku", &["sku", "itemsku", "item"]),
    ("quantity", &["quantity", "qty", "inspectedqty"]),
    ("repairs", &["repairs", "repair", "repairqty"]),
    ("scrap", &["scrap", "scrapqty", "fails"]),
    ("final_qty", &["finalqty", "finalquantity", "final"]),
    ("inspector", &["inspector", "inspectedby"]),
    ("red_flag", &["redflag", "red"]),
    ("ncr", &["ncrcomplete", "ncr"]),
    ("qc_fail", &["qcfail", "qcfails"]),
    ("sewing_fail", &["sewingfail", "sewfail", "sewingfails"]),
    ("stream", &["stream"]),
];

/// 支持的日期格式
// 两位年份格式须先于四位年份格式
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_to_raw_inspection(&self, record: &SourceRecord) -> ImportResult<RawInspectionRecord> {
        let row: HashMap<String, &str> = record
            .fields
            .iter()
            .map(|(k, v)| (normalize_header(k), v.as_str()))
            .collect();
        let row_number = record.row_number;

        Ok(RawInspectionRecord {
            order_number: self.get_string(&row, "order_number"),
            lot_number: self.get_string(&row, "lot_number"),
            due_date: self.parse_date(&row, "due_date", row_number)?,
            finished_date: self.parse_date(&row, "finished_date", row_number)?,
            sku: self.get_string(&row, "sku"),
            quantity: self.parse_count(&row, "quantity", row_number)?,
            repairs: self.parse_count(&row, "repairs", row_number)?,
            scrap: self.parse_count(&row, "scrap", row_number)?,
            final_qty: self.parse_count(&row, "final_qty", row_number)?,
            inspector: self.get_string(&row, "inspector"),
            red_flag: self.get_string(&row, "red_flag").is_some(),
            ncr: self.get_string(&row, "ncr").is_some(),
            qc_fail: self.parse_count(&row, "qc_fail", row_number)?,
            sewing_fail: self.parse_count(&row, "sewing_fail", row_number)?,
            stream: self.get_string(&row, "stream"),

            // 元信息
            sheet: record.sheet.clone(),
            row_number,
        })
    }
}

impl FieldMapper {
    /// 提取字符串字段（空白视为缺失），按别名顺序查找
    fn get_string(&self, row: &HashMap<String, &str>, key: &str) -> Option<String> {
        let aliases = ALIASES
            .iter()
            .find(|(field, _)| *field == key)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[]);

        for alias in aliases {
            if let Some(v) = row.get(*alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan") {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    /// 解析件数（允许 "12" / "12.0"，拒绝小数件数）
    fn parse_count(
        &self,
        row: &HashMap<String, &str>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<i64>> {
        let Some(value) = self.get_string(row, key) else {
            return Ok(None);
        };

        if let Ok(n) = value.parse::<i64>() {
            return Ok(Some(n));
        }
        match value.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(Some(f as i64))
            }
            _ => Err(ImportError::TypeConversionError {
                row: row_number,
                field: key.to_string(),
                message: format!("无法解析为整数件数: {}", value),
            }),
        }
    }

    /// 解析日期（支持多种常见格式，含日期时间）
    fn parse_date(
        &self,
        row: &HashMap<String, &str>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<NaiveDate>> {
        let Some(value) = self.get_string(row, key) else {
            return Ok(None);
        };

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&value, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(&value, fmt).ok())
                    .map(|dt| dt.date())
            })
            .map(Some)
            .ok_or_else(|| ImportError::DateFormatError {
                row: row_number,
                field: key.to_string(),
                value,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> SourceRecord {
        SourceRecord {
            sheet: None,
            row_number: 2,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_field_mapper_header_aliases() {
        let source = record(&[
            ("Order Number", "WO-1"),
            ("SKU", "AC-ESE-BK"),
            ("Qty", "12"),
            ("Finished_Date", "2026-01-15"),
            ("Sewing Fail", "2"),
        ]);
        let raw = FieldMapper.map_to_raw_inspection(&source).unwrap();

        assert_eq!(raw.order_number, Some("WO-1".to_string()));
        assert_eq!(raw.quantity, Some(12));
        assert_eq!(raw.sewing_fail, Some(2));
        assert_eq!(raw.finished_date, NaiveDate::from_ymd_opt(2026, 1, 15));
        assert_eq!(raw.scrap, None);
    }

    #[test]
    fn test_field_mapper_date_formats() {
        for value in ["01/15/2026", "20260115", "2026-01-15 08:30:00"] {
            let source = record(&[("Finished_Date", value)]);
            let raw = FieldMapper.map_to_raw_inspection(&source).unwrap();
            assert_eq!(raw.finished_date, NaiveDate::from_ymd_opt(2026, 1, 15));
        }
    }

    #[test]
    fn test_field_mapper_flags_non_blank() {
        let source = record(&[("Red_Flag", "X"), ("NCR_Complete", "  ")]);
        let raw = FieldMapper.map_to_raw_inspection(&source).unwrap();
        assert!(raw.red_flag);
        assert!(!raw.ncr);
    }

    #[test]
    fn test_field_mapper_float_counts() {
        let source = record(&[("Quantity", "12.0"), ("Repairs", "")]);
        let raw = FieldMapper.map_to_raw_inspection(&source).unwrap();
        assert_eq!(raw.quantity, Some(12));
        assert_eq!(raw.repairs, None);
    }

    #[test]
    fn test_field_mapper_invalid_number() {
        let source = record(&[("Quantity", "twelve")]);
        let err = FieldMapper.map_to_raw_inspection(&source).unwrap_err();
        assert!(err.is_row_level());
    }

    #[test]
    fn test_field_mapper_invalid_date() {
        let source = record(&[("Finished_Date", "sometime")]);
        let err = FieldMapper.map_to_raw_inspection(&source).unwrap_err();
        assert!(matches!(err, ImportError::DateFormatError { .. }));
    }
}
