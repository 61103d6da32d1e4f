// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 明细行解析器
// ==========================================
// 布局: 一行一个 (颜色, 尺码, 件数)
// 规则: 同名颜色跨行合并累加; 缺颜色或尺码的行跳过;
//       件数列取 Pieces 角色, 缺失时取尺码列之后第一个数值列
// ==========================================

use crate::domain::grid::{row_cell, RawGrid};
use crate::domain::types::{ColumnRole, ParseStrategy};
use crate::domain::wip::WipDataset;
use crate::importer::column_classifier::{ColumnClassifier, ColumnRoles};
use crate::importer::data_cleaner::{is_numeric_cell, normalize_size, parse_quantity, DataCleaner};
use crate::importer::format_parser::{build_dataset, capture_metadata, ColorAccumulator};
use crate::importer::format_detector::FormatCandidate;
use crate::importer::wip_importer_trait::{DataCleaner as _, FormatParser};
use tracing::debug;

pub struct DetailedParser;

impl DetailedParser {
    fn pieces_column(grid: &RawGrid, roles: &ColumnRoles, size_col: usize) -> Option<usize> {
        roles.first(ColumnRole::Pieces).or_else(|| {
            (size_col + 1..roles.len()).find(|idx| {
                roles.role(*idx) == ColumnRole::Unknown
                    && grid
                        .data_rows()
                        .first()
                        .map(|row| is_numeric_cell(row_cell(row, *idx)))
                        .unwrap_or(false)
            })
        })
    }
}

impl FormatParser for DetailedParser {
    fn parse(&self, grid: &RawGrid, candidate: &FormatCandidate) -> WipDataset {
        let roles = ColumnClassifier::classify(grid.headers());
        let cleaner = DataCleaner;

        let columns = roles
            .first(ColumnRole::Color)
            .zip(roles.first(ColumnRole::SizeToken))
            .and_then(|(color_col, size_col)| {
                Self::pieces_column(grid, &roles, size_col).map(|p| (color_col, size_col, p))
            });
        let layers_col = roles.first(ColumnRole::Layers);

        let mut colors = ColorAccumulator::new();
        if let Some((color_col, size_col, pieces_col)) = columns {
            for (row_idx, row) in grid.data_rows().iter().enumerate() {
                let name = cleaner.clean_text(row_cell(row, color_col));
                let size = normalize_size(row_cell(row, size_col));
                if name.is_empty() || size.is_empty() {
                    debug!(row = row_idx + 1, "row skipped: color or size missing");
                    continue;
                }

                let pieces = parse_quantity(row_cell(row, pieces_col));
                if pieces == 0 {
                    continue;
                }
                colors.add(&name, &size, pieces);
                if let Some(layers_col) = layers_col {
                    colors.max_layers(&name, parse_quantity(row_cell(row, layers_col)));
                }
            }
        }

        build_dataset(
            candidate,
            ParseStrategy::Detailed,
            colors,
            capture_metadata(grid, &roles),
        )
    }
}
