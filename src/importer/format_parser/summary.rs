// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 汇总/批次解析器
// ==========================================
// 布局: 每行一个颜色（或批次）的合计件数, 无尺码拆分
// 规则: 件数记入伪尺码 "Mixed";
//       名称列优先级 Color > Article > Lot > Order;
//       批号/款号/日期等元数据仅取第一条数据行
// ==========================================

use crate::domain::grid::{row_cell, RawGrid};
use crate::domain::types::{ColumnRole, ParseStrategy};
use crate::domain::wip::WipDataset;
use crate::importer::column_classifier::ColumnClassifier;
use crate::importer::data_cleaner::{parse_quantity, DataCleaner};
use crate::importer::format_detector::FormatCandidate;
use crate::importer::format_parser::{build_dataset, capture_metadata, ColorAccumulator, MIXED_SIZE};
use crate::importer::wip_importer_trait::{DataCleaner as _, FormatParser};
use tracing::debug;

const NAME_ROLES: [ColumnRole; 4] = [
    ColumnRole::Color,
    ColumnRole::Article,
    ColumnRole::Lot,
    ColumnRole::Order,
];

pub struct SummaryParser;

impl FormatParser for SummaryParser {
    fn parse(&self, grid: &RawGrid, candidate: &FormatCandidate) -> WipDataset {
        let roles = ColumnClassifier::classify(grid.headers());
        let cleaner = DataCleaner;

        let name_col = NAME_ROLES.iter().find_map(|role| roles.first(*role));
        let pieces_col = roles.first(ColumnRole::Pieces);
        let layers_col = roles.first(ColumnRole::Layers);

        let mut colors = ColorAccumulator::new();
        if let (Some(name_col), Some(pieces_col)) = (name_col, pieces_col) {
            for (row_idx, row) in grid.data_rows().iter().enumerate() {
                let name = cleaner.clean_text(row_cell(row, name_col));
                if name.is_empty() {
                    debug!(row = row_idx + 1, "row skipped: name missing");
                    continue;
                }
                let pieces = parse_quantity(row_cell(row, pieces_col));
                if pieces == 0 {
                    continue;
                }
                colors.add(&name, MIXED_SIZE, pieces);
                if let Some(layers_col) = layers_col {
                    colors.add_layers(&name, parse_quantity(row_cell(row, layers_col)));
                }
            }
        } else {
            debug!("summary layout without name or pieces column");
        }

        build_dataset(
            candidate,
            ParseStrategy::Summary,
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
        SummaryParser.parse(&grid, &report.selected)
    }

    #[test]
    fn test_summary_mixed_size() {
        let dataset = parse(vec![
            vec!["Lot", "Date", "Color", "Total Pcs"],
            vec!["B-7", "01/02/2025", "Maroon", "240"],
            vec!["B-8", "02/02/2025", "Maroon", "60"],
            vec!["B-8", "02/02/2025", "Grey", "120.5"],
        ]);

        assert_eq!(dataset.format, FormatType::ProductionSummary);
        assert_eq!(dataset.colors.len(), 2);
        let maroon = dataset.color("Maroon").unwrap();
        assert_eq!(maroon.pieces_by_size.get(MIXED_SIZE), Some(300));
        assert_eq!(maroon.layers, 9); // ceil(300 / 35)
        assert_eq!(dataset.color("Grey").unwrap().total, 120);
        assert_eq!(dataset.total_pieces, 420);

        // 元数据只取第一条数据行
        assert_eq!(dataset.metadata_value("lot"), Some("B-7"));
        assert_eq!(dataset.metadata_value("date"), Some("2025-02-01"));
    }

    #[test]
    fn test_summary_batch_names_without_color() {
        let dataset = parse(vec![
            vec!["Batch", "Shift", "Pieces", "Layers"],
            vec!["B1", "A", "50", "2"],
            vec!["B2", "B", "0", "1"],
        ]);

        assert_eq!(dataset.colors.len(), 1);
        assert_eq!(dataset.colors[0].name, "B1");
        assert_eq!(dataset.colors[0].layers, 2);
        assert_eq!(dataset.metadata_value("shift"), Some("A"));
    }
}
