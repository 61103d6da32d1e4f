// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 自由文本抽取器
// ==========================================
// 适用: layered_cutting / generic（无结构化列）
// 规则: 逐单元格匹配 "<颜色词> <数量> pcs <尺码>";
//       同一单元格内 "<数量> layer(s)" 作为这些颜色的层数;
//       按 TRIM 后的颜色文本累加
// ==========================================

use crate::domain::grid::RawGrid;
use crate::domain::types::ParseStrategy;
use crate::domain::wip::WipDataset;
use crate::importer::data_cleaner::{normalize_size, parse_quantity, DataCleaner};
use crate::importer::format_detector::FormatCandidate;
use crate::importer::format_parser::{build_dataset, ColorAccumulator};
use crate::importer::wip_importer_trait::{DataCleaner as _, FormatParser};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// "<words> <int> pcs <alnum>"
pub(crate) static PIECES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([\p{L}\p{M}][\p{L}\p{M} ]*?)\s+(\d+)\s*(?:pcs|pc|pieces)\b\.?\s*([\p{L}\p{N}]+)")
        .expect("Valid regex pattern")
});

/// "<int> layer(s)"
pub(crate) static LAYER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*layers?\b").expect("Valid regex pattern"));

pub struct FreeTextExtractor;

impl FreeTextExtractor {
    /// 抽取单个单元格, 返回该单元格命中的颜色
    fn extract_cell(&self, text: &str, colors: &mut ColorAccumulator) -> Vec<String> {
        let cleaner = DataCleaner;
        let layers = LAYER_PATTERN
            .captures(text)
            .map(|caps| parse_quantity(&caps[1]))
            .unwrap_or(0);

        // 层数片段先替换为分隔符, 避免 "layers" 被当作颜色词
        let stripped = LAYER_PATTERN.replace_all(text, " | ");

        let mut matched: Vec<String> = Vec::new();
        for caps in PIECES_PATTERN.captures_iter(&stripped) {
            let color = cleaner.clean_text(&caps[1]);
            let size = normalize_size(&caps[3]);
            if color.is_empty() || size.is_empty() {
                continue;
            }
            colors.add(&color, &size, parse_quantity(&caps[2]));
            if !matched.contains(&color) {
                matched.push(color);
            }
        }

        if layers > 0 {
            for color in &matched {
                colors.add_layers(color, layers);
            }
        }
        matched
    }
}

impl FormatParser for FreeTextExtractor {
    fn parse(&self, grid: &RawGrid, candidate: &FormatCandidate) -> WipDataset {
        let mut colors = ColorAccumulator::new();
        let mut hits = 0usize;

        for row in grid.rows() {
            for cell in row {
                if cell.trim().is_empty() {
                    continue;
                }
                hits += self.extract_cell(cell, &mut colors).len();
            }
        }

        let mut metadata = BTreeMap::new();
        if hits == 0 {
            tracing::warn!(format = %candidate.format_type, "free-text extraction found no piece counts");
        } else {
            metadata.insert("freeTextMatches".to_string(), hits.to_string());
        }

        build_dataset(candidate, ParseStrategy::FreeText, colors, metadata)
    }
}
