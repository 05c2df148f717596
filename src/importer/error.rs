// ==========================================
// ONE Tracker 质检分析引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 文件级错误终止导入；行级问题转为 RowRejection，不终止
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("工作簿无月度工作表（期望形如 JAN26 的表名）")]
    NoMonthlySheets,

    // ===== 数据映射错误 =====
    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("日期格式错误 (行 {row}, 字段 {field}): {value}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 行级映射错误（可转为剔除记录，不终止导入）
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            ImportError::TypeConversionError { .. } | ImportError::DateFormatError { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
