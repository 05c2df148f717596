// ==========================================
// ONE Tracker 质检分析引擎 - 检验记录导入器
// ==========================================
// 流程:
// 1) 解析文件 → 源记录
// 2) 字段映射 → RawInspectionRecord（映射失败 → InvalidValue 剔除）
// 3) Stream 非 SS → 排除（不计入剔除）
// 4) 行校验 → InspectionRow / RowRejection
// 文件级错误终止导入；行级问题只计数，不终止
// ==========================================

use crate::config::SkuCatalog;
use crate::domain::inspection::{InspectionDataset, RejectionKind, RowRejection};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::{SourceRecord, UniversalFileParser};
use crate::importer::inspection_importer_trait::{FieldMapper, FileParser, RowValidator};
use crate::importer::row_validator::InspectionRowValidator;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// 唯一纳入分析的生产流
pub const SS_STREAM: &str = "SS";

// ==========================================
// InspectionImporter - 检验记录导入器
// ==========================================
pub struct InspectionImporter {
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    row_validator: Box<dyn RowValidator>,
}

impl InspectionImporter {
    /// 默认管道（按扩展名解析 + 标准映射 + 标准校验）
    pub fn new(catalog: SkuCatalog) -> Self {
        Self::with_components(
            Box::new(UniversalFileParser),
            Box::new(FieldMapperImpl),
            Box::new(InspectionRowValidator::new(catalog)),
        )
    }

    pub fn with_components(
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        row_validator: Box<dyn RowValidator>,
    ) -> Self {
        Self {
            file_parser,
            field_mapper,
            row_validator,
        }
    }

    /// 从文件导入
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<InspectionDataset> {
        let records = self.file_parser.parse_to_raw_records(file_path.as_ref())?;
        let dataset = self.import_records(records);

        info!(
            rows = dataset.rows.len(),
            rejected = dataset.rejections.len(),
            other_stream = dataset.excluded_other_stream,
            "检验记录导入完成"
        );
        Ok(dataset)
    }

    /// 对已解析的源记录执行映射与校验
    pub fn import_records(&self, records: Vec<SourceRecord>) -> InspectionDataset {
        let mut dataset = InspectionDataset::default();

        for record in records {
            let raw = match self.field_mapper.map_to_raw_inspection(&record) {
                Ok(raw) => raw,
                Err(err) => {
                    dataset.rejections.push(mapping_rejection(&record, err));
                    continue;
                }
            };

            if let Some(stream) = raw.stream.as_deref() {
                if !stream.eq_ignore_ascii_case(SS_STREAM) {
                    dataset.excluded_other_stream += 1;
                    continue;
                }
            }

            match self.row_validator.validate(raw) {
                Ok(row) => dataset.rows.push(row),
                Err(rejection) => {
                    debug!(
                        row = rejection.row_number,
                        kind = %rejection.kind,
                        field = %rejection.field,
                        "行已剔除"
                    );
                    dataset.rejections.push(rejection);
                }
            }
        }

        if !dataset.rejections.is_empty() {
            warn!(count = dataset.rejections.len(), "存在被剔除的行");
        }
        dataset
    }
}

/// 映射错误 → 剔除记录
fn mapping_rejection(record: &SourceRecord, err: ImportError) -> RowRejection {
    let field = match &err {
        ImportError::TypeConversionError { field, .. } | ImportError::DateFormatError { field, .. } => {
            field.clone()
        }
        _ => String::new(),
    };
    RowRejection {
        row_number: record.row_number,
        sheet: record.sheet.clone(),
        kind: RejectionKind::InvalidValue,
        field,
        detail: err.to_string(),
    }
}
