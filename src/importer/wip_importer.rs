// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - WIP 导入器实现
// ==========================================
// 职责: 整合导入流程, 从表格到规范数据集
// 流程: 规整化 → 格式检测 → 策略解析 → 结构校验 → 统计
// 红线: 数据集本身不含批次号/时间戳, 同一输入重复导入结果一致
// ==========================================

use crate::domain::bundle::DEFAULT_MAX_BUNDLE_SIZE;
use crate::domain::grid::RawGrid;
use crate::domain::wip::{DatasetStatistics, ValidationReport, WipDataset};
use crate::importer::dq_validator::DqValidator as DqValidatorImpl;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::CsvGridParser;
use crate::importer::format_detector::{DetectionReport, DetectorConfig, FormatDetector};
use crate::importer::format_parser;
use crate::importer::wip_importer_trait::{DqValidator, WipImporter};
use crate::perf::PerfGuard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ImportOutcome - 单次导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub batch_id: String,
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub detection: DetectionReport,
    pub dataset: WipDataset,
    pub statistics: DatasetStatistics,
    pub validation: ValidationReport,
}

// ==========================================
// WipImporterImpl - WIP 导入器实现
// ==========================================
pub struct WipImporterImpl {
    detector_config: DetectorConfig,

    // 统计预估扎包数使用的扎包上限
    max_bundle_size: u32,

    grid_parser: CsvGridParser,
    dq_validator: Box<dyn DqValidator>,
}

impl Default for WipImporterImpl {
    fn default() -> Self {
        Self::new(DetectorConfig::default(), DEFAULT_MAX_BUNDLE_SIZE)
    }
}

impl WipImporterImpl {
    /// 创建导入器
    ///
    /// # 参数
    /// - detector_config: 检测阈值与采样行数
    /// - max_bundle_size: 统计预估扎包数使用的扎包上限
    pub fn new(detector_config: DetectorConfig, max_bundle_size: u32) -> Self {
        Self {
            detector_config,
            max_bundle_size,
            grid_parser: CsvGridParser,
            dq_validator: Box::new(DqValidatorImpl),
        }
    }

    /// 替换校验器
    pub fn with_validator(mut self, dq_validator: Box<dyn DqValidator>) -> Self {
        self.dq_validator = dq_validator;
        self
    }

    pub fn detector_config(&self) -> &DetectorConfig {
        &self.detector_config
    }

    /// 从 CSV 文件导入
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportOutcome> {
        let grid = self.grid_parser.parse_file(file_path)?;
        self.import(&grid)
    }
}

impl WipImporter for WipImporterImpl {
    #[instrument(skip(self, grid), fields(batch_id, rows = grid.row_count()))]
    fn import(&self, grid: &RawGrid) -> ImportResult<ImportOutcome> {
        let _perf = PerfGuard::new("wip_import");
        let start_time = Instant::now();
        let imported_at = Utc::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        if grid.row_count() < 2 {
            warn!(rows = grid.row_count(), "表格行数不足");
            return Err(ImportError::InvalidInputFormat(format!(
                "表格至少需要表头行和一行数据 (当前: {} 行)",
                grid.row_count()
            )));
        }

        // === 步骤 1: 规整化 ===
        let grid = grid.normalized();
        debug!(width = grid.width(), "步骤 1: 表格规整化完成");

        // === 步骤 2: 格式检测 ===
        let detection = FormatDetector::detect_with_config(&grid, &self.detector_config);
        info!(
            format = %detection.selected.format_type,
            confidence = detection.selected.confidence,
            "步骤 2: 格式检测完成"
        );

        // === 步骤 3: 策略解析 ===
        let dataset = format_parser::parse_grid(&grid, &detection.selected);
        debug!(
            strategy = %dataset.strategy,
            colors = dataset.colors.len(),
            total_pieces = dataset.total_pieces,
            "步骤 3: 解析完成"
        );

        // === 步骤 4: 结构校验 ===
        let validation = self.dq_validator.validate(&dataset);
        if !validation.is_valid {
            warn!(errors = ?validation.errors, "数据集结构校验未通过");
        }

        // === 步骤 5: 统计 ===
        let statistics = DatasetStatistics::from_dataset(&dataset, self.max_bundle_size);

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            batch_id = %batch_id,
            total_colors = statistics.total_colors,
            total_pieces = statistics.total_pieces,
            elapsed_ms,
            "WIP 导入完成"
        );

        Ok(ImportOutcome {
            batch_id,
            imported_at,
            elapsed_ms,
            detection,
            dataset,
            statistics,
            validation,
        })
    }

    fn import_csv_str(&self, content: &str) -> ImportResult<ImportOutcome> {
        let grid = self.grid_parser.parse_str(content)?;
        self.import(&grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{FormatType, ParseStrategy};

    fn create_test_importer() -> WipImporterImpl {
        WipImporterImpl::default()
    }

    #[test]
    fn test_import_rejects_header_only_grid() {
        let grid = RawGrid::from_rows(vec![vec!["Color", "S"]]);
        let result = create_test_importer().import(&grid);
        assert!(matches!(result, Err(ImportError::InvalidInputFormat(_))));

        let result = create_test_importer().import(&RawGrid::default());
        assert!(matches!(result, Err(ImportError::InvalidInputFormat(_))));
    }

    #[test]
    fn test_import_horizontal_matrix() {
        let outcome = create_test_importer()
            .import_csv_str("Color,XS,S,M,L\nBlue,10,20,15,5\n")
            .unwrap();

        assert_eq!(outcome.detection.selected.format_type, FormatType::SizeColorMatrix);
        assert_eq!(outcome.dataset.strategy, ParseStrategy::Horizontal);
        assert_eq!(outcome.dataset.total_pieces, 50);
        assert!(outcome.validation.is_valid);
        assert_eq!(outcome.statistics.total_colors, 1);
        assert_eq!(outcome.statistics.total_sizes, 4);
        assert_eq!(outcome.statistics.estimated_bundles, 4);
    }

    #[test]
    fn test_import_ragged_rows_are_padded() {
        let outcome = create_test_importer()
            .import_csv_str("Color,S,M,L\nRed,4,6\n")
            .unwrap();
        let red = outcome.dataset.color("Red").unwrap();
        assert_eq!(red.total, 10);
        assert_eq!(red.pieces_by_size.get("L"), None);
    }

    #[test]
    fn test_import_dataset_is_idempotent() {
        let importer = create_test_importer();
        let content = "Size,Red,Blue\nS,5,7\nM,8,9\n";
        let first = importer.import_csv_str(content).unwrap();
        let second = importer.import_csv_str(content).unwrap();

        assert_eq!(first.dataset, second.dataset);
        assert_ne!(first.batch_id, second.batch_id);
    }
}
