// ==========================================
// ONE Tracker 质检分析引擎 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// Excel: 逐个读取月度工作表（形如 JAN26），跳过 Reference / KPI 表
//        SS 表位于第 0~17 列，首行为表头，按列位置取值
// CSV:   首行为表头，按列名取值（列名别名由字段映射器处理）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::inspection_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// 月度工作表 SS 表的列位置（第 0~17 列）
pub const SS_COLUMNS: [&str; 18] = [
    "Order_Number",
    "Lot_Number",
    "Due_Date",
    "Finished_Date",
    "SKU",
    "Quantity",
    "Repairs",
    "Repair_Pct",
    "Scrap",
    "Pass_Pct",
    "Final_Qty",
    "Inspector",
    "Red_Flag",
    "NCR_Complete",
    "QC_Fail",
    "Sewing_Fail",
    "Stream",
    "Notes",
];

// ==========================================
// SourceRecord - 解析后的源记录
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRecord {
    /// 来源工作表（CSV 为 None）
    pub sheet: Option<String>,
    /// 源文件中的行号（从 1 开始，含表头行）
    pub row_number: usize,
    pub fields: HashMap<String, String>,
}

impl SourceRecord {
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }
}

/// 是否为月度数据工作表（三个字母 + 两位数字）
pub fn is_monthly_sheet(name: &str) -> bool {
    if name.contains("Reference") || name.contains("KPI") {
        return false;
    }
    let chars: Vec<char> = name.chars().collect();
    chars.len() == 5
        && chars[..3].iter().all(|c| c.is_ascii_alphabetic())
        && chars[3..].iter().all(|c| c.is_ascii_digit())
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<SourceRecord>> {
        check_exists(file_path)?;

        // 检查扩展名（无扩展名的临时文件放行）
        let ext = extension_of(file_path);
        if !ext.is_empty() && ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut fields = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            let source = SourceRecord {
                sheet: None,
                // 表头占第 1 行
                row_number: idx + 2,
                fields,
            };
            // 跳过完全空白的行
            if source.is_blank() {
                continue;
            }
            records.push(source);
        }

        debug!(records = records.len(), "CSV 解析完成");
        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

/// 单元格 → 文本；日期单元格统一为 YYYY-MM-DD
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string().trim().to_string(),
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<SourceRecord>> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;
        let sheets: Vec<String> = workbook
            .sheet_names()
            .into_iter()
            .filter(|name| is_monthly_sheet(name))
            .collect();
        if sheets.is_empty() {
            return Err(ImportError::NoMonthlySheets);
        }

        let mut records = Vec::new();
        for sheet in &sheets {
            let range = match workbook.worksheet_range(sheet) {
                Ok(range) => range,
                Err(e) => {
                    // 单个工作表损坏不影响其他月份
                    warn!(sheet = %sheet, error = %e, "工作表读取失败，已跳过");
                    continue;
                }
            };
            let (start_row, start_col) = range
                .start()
                .map(|(r, c)| (r as usize, c as usize))
                .unwrap_or((0, 0));

            // 首行为表头
            for (idx, data_row) in range.rows().enumerate().skip(1) {
                let mut fields = HashMap::new();
                for (col_idx, cell) in data_row.iter().enumerate() {
                    if let Some(name) = SS_COLUMNS.get(start_col + col_idx) {
                        fields.insert(name.to_string(), cell_text(cell));
                    }
                }

                let source = SourceRecord {
                    sheet: Some(sheet.clone()),
                    row_number: start_row + idx + 1,
                    fields,
                };
                if source.is_blank() {
                    continue;
                }
                records.push(source);
            }
        }

        debug!(sheets = sheets.len(), records = records.len(), "Excel 解析完成");
        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<SourceRecord>> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
