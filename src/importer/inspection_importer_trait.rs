// ==========================================
// ONE Tracker 质检分析引擎 - 导入管道 Trait
// ==========================================
// 管道: 文件解析 → 字段映射 → 行校验
// 职责: 定义各阶段接口（不包含实现）
// ==========================================

use crate::domain::inspection::{InspectionRow, RawInspectionRecord, RowRejection};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::SourceRecord;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析（阶段 0）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<SourceRecord>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 源列名 → 标准字段 + 类型转换（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    fn map_to_raw_inspection(&self, record: &SourceRecord) -> ImportResult<RawInspectionRecord>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 必填/取值/数量一致性校验，派生父 SKU 与最终数量（阶段 2）
// 实现者: InspectionRowValidator
pub trait RowValidator: Send + Sync {
    fn validate(&self, raw: RawInspectionRecord) -> Result<InspectionRow, RowRejection>;
}
