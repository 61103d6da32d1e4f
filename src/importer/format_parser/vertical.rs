// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 纵向矩阵解析器
// ==========================================
// 布局: 一行一码, Size 列之后的表头为颜色
// 规则: cell[行][颜色列] 为该 (颜色, 尺码) 件数, 按颜色累加;
//       尺码单元格为 "Total" 等合计行时跳过
// ==========================================

use crate::domain::grid::{row_cell, RawGrid};
use crate::domain::types::{ColumnRole, ParseStrategy};
use crate::domain::wip::WipDataset;
use crate::importer::column_classifier::ColumnClassifier;
use crate::importer::data_cleaner::{normalize_size, parse_quantity};
use crate::importer::format_detector::{vertical_color_columns, FormatCandidate};
use crate::importer::format_parser::{build_dataset, capture_metadata, ColorAccumulator};
use crate::importer::wip_importer_trait::FormatParser;
use tracing::debug;

pub struct VerticalParser;

impl FormatParser for VerticalParser {
    fn parse(&self, grid: &RawGrid, candidate: &FormatCandidate) -> WipDataset {
        let headers = grid.headers();
        let roles = ColumnClassifier::classify(headers);

        let mut colors = ColorAccumulator::new();
        if let Some(size_col) = roles.first(ColumnRole::SizeToken) {
            let color_cols: Vec<(usize, String)> = vertical_color_columns(headers, &roles, size_col)
                .into_iter()
                .map(|idx| (idx, headers[idx].trim().to_string()))
                .collect();

            for (row_idx, row) in grid.data_rows().iter().enumerate() {
                let raw_size = row_cell(row, size_col);
                let size = normalize_size(raw_size);
                if size.is_empty() || ColumnClassifier::classify_header(raw_size) == ColumnRole::Pieces {
                    debug!(row = row_idx + 1, "row skipped: no size label");
                    continue;
                }

                for (col, color) in &color_cols {
                    colors.add(color, &size, parse_quantity(row_cell(row, *col)));
                }
            }
        }

        build_dataset(
            candidate,
            ParseStrategy::Vertical,
            colors,
            capture_metadata(grid, &roles),
        )
    }
}
