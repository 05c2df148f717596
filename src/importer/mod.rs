// ==========================================
// ONE Tracker 质检分析引擎 - 导入层
// ==========================================
// 职责: 外部检验日志 → 标准化的只读检验记录
// 支持: Excel（月度工作表）, CSV
// 说明: 导入层是引擎的薄协作者，引擎只接收标准化后的记录
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod inspection_importer;
pub mod inspection_importer_trait;
pub mod row_validator;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{is_monthly_sheet, CsvParser, ExcelParser, SourceRecord, UniversalFileParser, SS_COLUMNS};
pub use inspection_importer::{InspectionImporter, SS_STREAM};
pub use row_validator::InspectionRowValidator;

// 重导出 Trait 接口
pub use inspection_importer_trait::{FieldMapper, FileParser, RowValidator};
