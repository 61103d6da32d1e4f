// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 表格读取器
// ==========================================
// 阶段 0: CSV 文本 → RawGrid
// 规则: 不区分表头（第 0 行即表头）, 允许行长度不一致,
//       单元格去首尾空白, 跳过完全空白的行
// ==========================================

use crate::domain::grid::RawGrid;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

// ==========================================
// CSV Grid Parser
// ==========================================
pub struct CsvGridParser;

impl CsvGridParser {
    /// 解析 CSV 文本
    pub fn parse_str(&self, content: &str) -> ImportResult<RawGrid> {
        self.parse_reader(content.as_bytes())
    }

    /// 解析 CSV 文件
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawGrid> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileReadError(format!(
                "文件不存在: {}",
                path.display()
            )));
        }
        let file = File::open(path)?;
        self.parse_reader(file)
    }

    /// 解析任意读取源
    pub fn parse_reader<R: Read>(&self, reader: R) -> ImportResult<RawGrid> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if row.iter().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        tracing::debug!(rows = rows.len(), "csv grid parsed");
        Ok(RawGrid::new(rows))
    }
}
