// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 数据清洗器实现
// ==========================================
// 职责: 表头标准化 / 尺码标准化 / 数值单元格规则 / 日期标准化
// ==========================================

use crate::importer::wip_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_header(&self, value: &str) -> String {
        normalize_header(value)
    }

    fn normalize_size(&self, value: &str) -> String {
        normalize_size(value)
    }

    fn parse_quantity(&self, value: &str) -> u32 {
        parse_quantity(value)
    }

    fn clean_text(&self, value: &str) -> String {
        value.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// 表头标准化
///
/// # 规则
/// - NFD 分解后去除拉丁组合附加符号（U+0300..U+036F）
/// - 转小写
/// - 标点替换为空格, 折叠空白
/// - 天城文字母与元音符号保留
pub fn normalize_header(value: &str) -> String {
    let stripped: String = value
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
        .map(|c| {
            if c.is_alphanumeric() || is_devanagari(c) {
                c
            } else {
                ' '
            }
        })
        .flat_map(|c| c.to_lowercase())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 尺码标准化：去除全部非字母数字字符并转大写
pub fn normalize_size(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// 数值单元格规则
///
/// # 规则
/// - 空白/非数值 → 0
/// - 负数 → 0
/// - 小数 → 向下取整
/// - 千分位逗号忽略（"1,200" → 1200）
pub fn parse_quantity(value: &str) -> u32 {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => {
            let floored = v.floor();
            if floored >= u32::MAX as f64 {
                u32::MAX
            } else {
                floored as u32
            }
        }
        _ => 0,
    }
}

/// 单元格是否为纯数值
pub fn is_numeric_cell(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().map(|v| v.is_finite()).unwrap_or(false)
}

/// 日期标准化为 ISO（YYYY-MM-DD）, 无法识别时原样返回
pub fn normalize_date(value: &str) -> String {
    let trimmed = value.trim();
    const FORMATS: [&str; 6] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y%m%d", "%Y/%m/%d"];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}
