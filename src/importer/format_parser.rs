// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 格式解析器
// ==========================================
// 职责: 按检测结果选择解析策略, 输出规范数据集
// 策略: 横向矩阵 / 纵向矩阵 / 明细行 / 汇总 / 自由文本
// 红线: 结构化解析与自由文本抽取是两条独立路径,
//       由检测结果显式选择, 不做静默兜底
// ==========================================

pub mod detailed;
pub mod free_text;
pub mod horizontal;
pub mod summary;
pub mod vertical;

use crate::domain::grid::RawGrid;
use crate::domain::types::{ColumnRole, FormatType, ParseStrategy};
use crate::domain::wip::{ColorEntry, WipDataset};
use crate::importer::column_classifier::{ColumnClassifier, ColumnRoles};
use crate::importer::data_cleaner::normalize_date;
use crate::importer::format_detector::FormatCandidate;
use crate::importer::wip_importer_trait::FormatParser;
use std::collections::BTreeMap;

pub use detailed::DetailedParser;
pub use free_text::FreeTextExtractor;
pub use horizontal::HorizontalParser;
pub use summary::SummaryParser;
pub use vertical::VerticalParser;

/// 汇总格式的伪尺码
pub const MIXED_SIZE: &str = "Mixed";

/// 元数据采集的角色（取第一条数据行）
const METADATA_ROLES: [ColumnRole; 10] = [
    ColumnRole::Lot,
    ColumnRole::Article,
    ColumnRole::Buyer,
    ColumnRole::Order,
    ColumnRole::Fabric,
    ColumnRole::FabricWeight,
    ColumnRole::Consumption,
    ColumnRole::Date,
    ColumnRole::Shift,
    ColumnRole::Cutter,
];

// ==========================================
// 策略选择
// ==========================================

/// 根据检测结果与表头选择解析策略
///
/// # 规则
/// - cutting_sheet → 横向
/// - size_color_matrix → 尺码列 >= 2 横向; 有 Color+Size 列 → 明细; 仅 Size 列 → 纵向
/// - production_summary / batch_wise_data → 汇总
/// - layered_cutting / generic → 自由文本
pub fn select_strategy(grid: &RawGrid, candidate: &FormatCandidate) -> ParseStrategy {
    match candidate.format_type {
        FormatType::CuttingSheet => ParseStrategy::Horizontal,
        FormatType::SizeColorMatrix => {
            let headers = grid.headers();
            let roles = ColumnClassifier::classify(headers);
            let size_columns = ColumnClassifier::find_size_columns(headers);
            if size_columns.len() >= 2 {
                ParseStrategy::Horizontal
            } else if roles.has(ColumnRole::SizeToken) && roles.has(ColumnRole::Color) {
                ParseStrategy::Detailed
            } else {
                ParseStrategy::Vertical
            }
        }
        FormatType::ProductionSummary | FormatType::BatchWiseData => ParseStrategy::Summary,
        FormatType::LayeredCutting | FormatType::Generic => ParseStrategy::FreeText,
    }
}

/// 策略对应的解析器实例
pub fn parser_for(strategy: ParseStrategy) -> Box<dyn FormatParser> {
    match strategy {
        ParseStrategy::Horizontal => Box::new(HorizontalParser),
        ParseStrategy::Vertical => Box::new(VerticalParser),
        ParseStrategy::Detailed => Box::new(DetailedParser),
        ParseStrategy::Summary => Box::new(SummaryParser),
        ParseStrategy::FreeText => Box::new(FreeTextExtractor),
    }
}

/// 选择策略并解析（表格须已规整化）
pub fn parse_grid(grid: &RawGrid, candidate: &FormatCandidate) -> WipDataset {
    let strategy = select_strategy(grid, candidate);
    tracing::debug!(format = %candidate.format_type, strategy = %strategy, "parse strategy selected");
    parser_for(strategy).parse(grid, candidate)
}

// ==========================================
// 层数推算
// ==========================================

/// 无明确层数时按合计件数推算
///
/// # 规则
/// - total <= 25  → ceil(total / 12)
/// - total <= 100 → ceil(total / 25)
/// - total <= 300 → ceil(total / 35)
/// - 其他        → ceil(total / 50)
pub fn estimate_layers(total: u32) -> u32 {
    let per_layer = match total {
        0..=25 => 12,
        26..=100 => 25,
        101..=300 => 35,
        _ => 50,
    };
    total.div_ceil(per_layer)
}

// ==========================================
// ColorAccumulator - 按颜色名合并累加
// ==========================================
#[derive(Debug, Default)]
pub(crate) struct ColorAccumulator {
    colors: Vec<ColorEntry>,
}

impl ColorAccumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, name: &str) -> &mut ColorEntry {
        let idx = match self.colors.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.colors.push(ColorEntry::new(name));
                self.colors.len() - 1
            }
        };
        &mut self.colors[idx]
    }

    pub(crate) fn add(&mut self, name: &str, size: &str, pieces: u32) {
        if pieces == 0 {
            return;
        }
        self.entry(name).add_pieces(size, pieces);
    }

    /// 层数累加（同色多次铺布）
    pub(crate) fn add_layers(&mut self, name: &str, layers: u32) {
        if layers == 0 {
            return;
        }
        let entry = self.entry(name);
        entry.layers = entry.layers.saturating_add(layers);
    }

    /// 层数取最大（明细行重复记录同一铺布）
    pub(crate) fn max_layers(&mut self, name: &str, layers: u32) {
        let entry = self.entry(name);
        entry.layers = entry.layers.max(layers);
    }

    /// 完成合计: 丢弃零件数颜色, 缺失层数时推算, 计算每层件数
    pub(crate) fn finish(self) -> Vec<ColorEntry> {
        self.colors
            .into_iter()
            .filter_map(|mut color| {
                color.refresh_totals();
                if color.total == 0 {
                    return None;
                }
                if color.layers == 0 {
                    color.layers = estimate_layers(color.total);
                }
                color.refresh_totals();
                Some(color)
            })
            .collect()
    }
}

// ==========================================
// 元数据采集
// ==========================================

/// 从第一条数据行采集批号/款号/日期等元数据
pub(crate) fn capture_metadata(grid: &RawGrid, roles: &ColumnRoles) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    let first_row = match grid.data_rows().first() {
        Some(row) => row,
        None => return metadata,
    };

    for role in METADATA_ROLES {
        if let Some(idx) = roles.first(role) {
            let raw = crate::domain::grid::row_cell(first_row, idx).trim();
            if raw.is_empty() {
                continue;
            }
            let value = if role == ColumnRole::Date {
                normalize_date(raw)
            } else {
                raw.to_string()
            };
            metadata.insert(role.as_str().to_string(), value);
        }
    }
    metadata
}

/// 组装数据集
pub(crate) fn build_dataset(
    candidate: &FormatCandidate,
    strategy: ParseStrategy,
    colors: ColorAccumulator,
    metadata: BTreeMap<String, String>,
) -> WipDataset {
    WipDataset::new(candidate.format_type, strategy, colors.finish(), metadata)
}
