// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 横向矩阵解析器
// ==========================================
// 布局: 一行一色, 尺码为列（裁剪单 / 横向尺码矩阵）
// 规则: 尺码列逐行累加; 行合计为 0 的行丢弃;
//       层数取 Layers 列, 缺失时按合计推算
// ==========================================

use crate::domain::grid::{row_cell, RawGrid};
use crate::domain::types::{ColumnRole, ParseStrategy};
use crate::domain::wip::WipDataset;
use crate::importer::column_classifier::ColumnClassifier;
use crate::importer::data_cleaner::{parse_quantity, DataCleaner};
use crate::importer::format_detector::FormatCandidate;
use crate::importer::format_parser::{build_dataset, capture_metadata, ColorAccumulator};
use crate::importer::wip_importer_trait::{DataCleaner as _, FormatParser};
use tracing::debug;

pub struct HorizontalParser;

impl FormatParser for HorizontalParser {
    fn parse(&self, grid: &RawGrid, candidate: &FormatCandidate) -> WipDataset {
        let headers = grid.headers();
        let roles = ColumnClassifier::classify(headers);
        let size_columns = ColumnClassifier::find_size_columns(headers);
        let cleaner = DataCleaner;

        // 颜色列: Color 角色优先, 否则取第一个未识别的非尺码列
        let color_col = roles.first(ColumnRole::Color).or_else(|| {
            roles.iter().map(|(idx, _)| idx).find(|idx| {
                roles.role(*idx) == ColumnRole::Unknown
                    && !size_columns.iter().any(|s| s.column_index == *idx)
            })
        });
        let layers_col = roles.first(ColumnRole::Layers);

        let mut colors = ColorAccumulator::new();
        if let Some(color_col) = color_col {
            for (row_idx, row) in grid.data_rows().iter().enumerate() {
                let name = cleaner.clean_text(row_cell(row, color_col));
                if name.is_empty() {
                    debug!(row = row_idx + 1, "row skipped: color missing");
                    continue;
                }

                let row_sizes: Vec<(&str, u32)> = size_columns
                    .iter()
                    .map(|s| (s.size.as_str(), parse_quantity(row_cell(row, s.column_index))))
                    .collect();
                let row_total = row_sizes
                    .iter()
                    .fold(0u32, |acc, (_, q)| acc.saturating_add(*q));
                if row_total == 0 {
                    debug!(row = row_idx + 1, color = %name, "row skipped: zero total");
                    continue;
                }

                for (size, pieces) in row_sizes {
                    colors.add(&name, size, pieces);
                }
                if let Some(layers_col) = layers_col {
                    colors.add_layers(&name, parse_quantity(row_cell(row, layers_col)));
                }
            }
        }

        build_dataset(
            candidate,
            ParseStrategy::Horizontal,
            colors,
            capture_metadata(grid, &roles),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::FormatType;
    use crate::importer::format_detector::FormatDetector;

    fn parse(rows: Vec<Vec<&str>>) -> WipDataset {
        let grid = RawGrid::from_rows(rows).normalized();
        let report = FormatDetector::detect(&grid);
        HorizontalParser.parse(&grid, &report.selected)
    }

    #[test]
    fn test_horizontal_basic_row() {
        let dataset = parse(vec![
            vec!["Color", "XS", "S", "M", "L"],
            vec!["Blue", "10", "20", "15", "5"],
        ]);

        assert_eq!(dataset.format, FormatType::SizeColorMatrix);
        assert_eq!(dataset.colors.len(), 1);
        let blue = &dataset.colors[0];
        assert_eq!(blue.name, "Blue");
        let sizes: Vec<_> = blue.pieces_by_size.iter().collect();
        assert_eq!(sizes, vec![("XS", 10), ("S", 20), ("M", 15), ("L", 5)]);
        assert_eq!(blue.total, 50);
        assert_eq!(dataset.total_pieces, 50);
    }

    #[test]
    fn test_horizontal_layers_column_and_zero_rows() {
        let dataset = parse(vec![
            vec!["Lot", "Color", "Layers", "S", "M", "L"],
            vec!["L-9", "Red", "20", "40", "60", "40"],
            vec!["L-9", "Black", "10", "0", "", "x"],
            vec!["L-9", "", "10", "5", "5", "5"],
        ]);

        assert_eq!(dataset.colors.len(), 1);
        let red = &dataset.colors[0];
        assert_eq!(red.total, 140);
        assert_eq!(red.layers, 20);
        assert_eq!(red.pieces_per_layer, 7);
        assert_eq!(dataset.metadata_value("lot"), Some("L-9"));
    }

    #[test]
    fn test_horizontal_duplicate_colors_merge() {
        let dataset = parse(vec![
            vec!["Color", "S", "M", "L"],
            vec!["Navy", "10", "10", "10"],
            vec![" Navy ", "5", "", "2.7"],
        ]);

        assert_eq!(dataset.colors.len(), 1);
        let navy = &dataset.colors[0];
        assert_eq!(navy.pieces_by_size.get("S"), Some(15));
        assert_eq!(navy.pieces_by_size.get("L"), Some(12));
        assert_eq!(navy.total, 37);
        // 无层数列: ceil(37 / 25)
        assert_eq!(navy.layers, 2);
    }
}
