// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - WIP 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::grid::RawGrid;
use crate::domain::wip::{ValidationReport, WipDataset};
use crate::importer::error::ImportResult;
use crate::importer::format_detector::FormatCandidate;
use crate::importer::wip_importer::ImportOutcome;

// ==========================================
// WipImporter Trait
// ==========================================
// 用途: WIP 导入主接口
// 实现者: WipImporterImpl
pub trait WipImporter: Send + Sync {
    /// 导入已读取的表格
    ///
    /// # 参数
    /// - grid: 原始表格（第 0 行为表头, 允许短行）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 检测结果 + 数据集 + 统计 + 校验报告
    /// - Err: 表格少于 2 行（InvalidInputFormat）
    ///
    /// # 导入流程（5个阶段）
    /// 1. 表格规整化（短行补齐）
    /// 2. 格式检测（列角色识别 + 假设评分）
    /// 3. 按检测结果选择解析策略
    /// 4. 结构校验（仅提示, 不阻断）
    /// 5. 统计汇总
    fn import(&self, grid: &RawGrid) -> ImportResult<ImportOutcome>;

    /// 从 CSV 文本导入
    fn import_csv_str(&self, content: &str) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FormatParser Trait
// ==========================================
// 用途: 格式解析策略（阶段 3）
// 实现者: HorizontalParser, VerticalParser, DetailedParser, SummaryParser, FreeTextExtractor
pub trait FormatParser: Send + Sync {
    /// 将规整化表格解析为规范数据集
    ///
    /// # 参数
    /// - grid: 规整化后的表格
    /// - candidate: 格式检测结果
    ///
    /// # 返回
    /// - WipDataset: 已完成合计与层数推算的数据集
    fn parse(&self, grid: &RawGrid, candidate: &FormatCandidate) -> WipDataset;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口
// 实现者: data_cleaner::DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 表头标准化（小写、去附加符号、去标点）
    fn normalize_header(&self, value: &str) -> String;

    /// 尺码标准化（去非字母数字、大写）
    fn normalize_size(&self, value: &str) -> String;

    /// 数值单元格转件数
    ///
    /// # 规则
    /// - 非数值/空白 → 0; 负数 → 0; 小数向下取整
    fn parse_quantity(&self, value: &str) -> u32;

    /// 文本清洗（TRIM + 折叠空白）
    fn clean_text(&self, value: &str) -> String;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 数据集结构校验（阶段 4）
// 实现者: dq_validator::DqValidator
pub trait DqValidator: Send + Sync {
    /// 校验数据集
    ///
    /// # 返回
    /// - ValidationReport: errors 非空则 is_valid = false
    fn validate(&self, dataset: &WipDataset) -> ValidationReport;
}
