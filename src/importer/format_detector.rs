// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 格式检测器
// ==========================================
// 职责: 对五种表格格式假设打分, 选出最可信的格式
// 规则: 置信度 = 得分 / 100; <= 阈值的候选丢弃;
//       最高者胜出, 平局按声明顺序; 全部丢弃 → generic
// 红线: 纯函数, 不修改输入表格
// ==========================================

use crate::domain::grid::RawGrid;
use crate::domain::types::{ColumnRole, FormatType};
use crate::importer::column_classifier::{ColumnClassifier, ColumnRoles, SizeColumn};
use crate::importer::data_cleaner::is_numeric_cell;
use crate::importer::format_parser::free_text::{LAYER_PATTERN, PIECES_PATTERN};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 默认置信度阈值（严格大于才保留）
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// 默认采样行数
pub const DEFAULT_SAMPLE_ROWS: usize = 5;

// ==========================================
// DetectorConfig - 检测参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorConfig {
    pub confidence_threshold: f64,
    pub sample_rows: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

// ==========================================
// FormatCandidate - 格式候选
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatCandidate {
    pub format_type: FormatType,
    pub score: u32,
    pub confidence: f64,
    pub matched_roles: Vec<ColumnRole>,
    pub reasons: Vec<String>, // 加分项说明（可解释性）
}

impl FormatCandidate {
    /// 无候选通过阈值时的兜底结果
    pub fn generic(matched_roles: Vec<ColumnRole>) -> Self {
        Self {
            format_type: FormatType::Generic,
            score: 0,
            confidence: 0.0,
            matched_roles,
            reasons: vec!["GENERIC: no hypothesis above threshold".to_string()],
        }
    }
}

// ==========================================
// DetectionReport - 检测报告（含全部候选, 供诊断）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub selected: FormatCandidate,
    pub candidates: Vec<FormatCandidate>,
    pub roles: ColumnRoles,
    pub size_columns: Vec<SizeColumn>,
}

// ==========================================
// 表头信号 - 各假设共用的布尔/比例检查
// ==========================================
struct Signals {
    roles: ColumnRoles,
    size_columns: Vec<SizeColumn>,
    any_numeric: bool,
    pieces_text_hit: bool,
    layer_text_hit: bool,
    vertical_colors: usize,
}

impl Signals {
    fn collect(grid: &RawGrid, sample_rows: usize) -> Self {
        let headers = grid.headers();
        let roles = ColumnClassifier::classify(headers);
        let size_columns = ColumnClassifier::find_size_columns(headers);
        let samples = grid.sample_rows(sample_rows);

        let any_numeric = samples
            .iter()
            .flat_map(|row| row.iter())
            .any(|cell| is_numeric_cell(cell));

        // 自由文本检查同时覆盖表头行（整张表可能只是备注文本）
        let text_cells = || headers.iter().chain(samples.iter().flat_map(|r| r.iter()));
        let pieces_text_hit = text_cells().any(|c| PIECES_PATTERN.is_match(c));
        let layer_text_hit = text_cells().any(|c| LAYER_PATTERN.is_match(c));

        let vertical_colors = match roles.first(ColumnRole::SizeToken) {
            Some(size_col) => vertical_color_columns(headers, &roles, size_col).len(),
            None => 0,
        };

        Self {
            roles,
            size_columns,
            any_numeric,
            pieces_text_hit,
            layer_text_hit,
            vertical_colors,
        }
    }

    fn has(&self, role: ColumnRole) -> bool {
        self.roles.has(role)
    }

    fn size_axis(&self) -> bool {
        self.size_columns.len() >= 2 || self.has(ColumnRole::SizeToken)
    }

    fn present(&self, roles: &[ColumnRole]) -> Vec<ColumnRole> {
        roles.iter().copied().filter(|r| self.has(*r)).collect()
    }
}

/// 纵向矩阵中作为颜色的列: Size 列之后、未识别角色、非尺码、非空表头
pub(crate) fn vertical_color_columns<S: AsRef<str>>(
    headers: &[S],
    roles: &ColumnRoles,
    size_col: usize,
) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .skip(size_col + 1)
        .filter(|(idx, header)| {
            let text = header.as_ref().trim();
            !text.is_empty()
                && roles.role(*idx) == ColumnRole::Unknown
                && !ColumnClassifier::is_size_label(text)
        })
        .map(|(idx, _)| idx)
        .collect()
}

// ==========================================
// 打分器 - 累计得分与原因
// ==========================================
struct Scorer {
    score: u32,
    reasons: Vec<String>,
}

impl Scorer {
    fn new() -> Self {
        Self {
            score: 0,
            reasons: Vec::new(),
        }
    }

    fn add_if(&mut self, condition: bool, points: u32, reason: &str) {
        if condition && points > 0 {
            self.score += points;
            self.reasons.push(format!("+{} {}", points, reason));
        }
    }

    fn finish(self, format_type: FormatType, matched_roles: Vec<ColumnRole>) -> FormatCandidate {
        let score = self.score.min(100);
        FormatCandidate {
            format_type,
            score,
            confidence: score as f64 / 100.0,
            matched_roles,
            reasons: self.reasons,
        }
    }
}

// ==========================================
// FormatDetector - 纯函数工具类
// ==========================================
pub struct FormatDetector;

impl FormatDetector {
    /// 检测表格格式（默认参数）
    pub fn detect(grid: &RawGrid) -> DetectionReport {
        Self::detect_with_config(grid, &DetectorConfig::default())
    }

    /// 检测表格格式
    ///
    /// # 返回
    /// - DetectionReport.selected: 选中的格式（可能为 generic）
    /// - DetectionReport.candidates: 五个假设的全部评分（声明顺序）
    pub fn detect_with_config(grid: &RawGrid, config: &DetectorConfig) -> DetectionReport {
        let signals = Signals::collect(grid, config.sample_rows);

        let candidates: Vec<FormatCandidate> = FormatType::SCORED
            .iter()
            .map(|format_type| Self::score(*format_type, &signals))
            .collect();

        for c in &candidates {
            debug!(
                format = %c.format_type,
                score = c.score,
                reasons = ?c.reasons,
                "format hypothesis scored"
            );
        }

        let selected = Self::select(&candidates, config.confidence_threshold)
            .unwrap_or_else(|| FormatCandidate::generic(signals.roles.matched()));

        DetectionReport {
            selected,
            candidates,
            roles: signals.roles,
            size_columns: signals.size_columns,
        }
    }

    /// 选择规则
    ///
    /// 1. 丢弃置信度 <= threshold 的候选
    /// 2. 取置信度最高者
    /// 3. 平局时取声明顺序靠前者（candidates 须按 FormatType::SCORED 顺序排列）
    pub fn select(candidates: &[FormatCandidate], threshold: f64) -> Option<FormatCandidate> {
        let mut best: Option<&FormatCandidate> = None;
        for candidate in candidates.iter().filter(|c| c.confidence > threshold) {
            match best {
                Some(current) if candidate.confidence <= current.confidence => {}
                _ => best = Some(candidate),
            }
        }
        best.cloned()
    }

    fn score(format_type: FormatType, s: &Signals) -> FormatCandidate {
        use ColumnRole::*;

        let mut scorer = Scorer::new();
        let roles = match format_type {
            FormatType::CuttingSheet => {
                let meta = s.present(&[Lot, Article, Fabric, Consumption]);
                scorer.add_if(s.has(Color), 25, "color column");
                scorer.add_if(s.size_columns.len() >= 3, 25, ">=3 size columns");
                scorer.add_if(s.has(Layers), 20, "layers column");
                scorer.add_if(
                    !meta.is_empty(),
                    (20 * meta.len() as u32) / 4,
                    "lot/article/fabric/consumption columns",
                );
                scorer.add_if(s.any_numeric, 10, "numeric sample cell");
                s.present(&[Color, Layers, Lot, Article, Fabric, Consumption])
            }
            FormatType::ProductionSummary => {
                scorer.add_if(s.has(Pieces), 30, "pieces/total column");
                scorer.add_if(s.has(Color) || s.has(Article), 20, "color or article column");
                scorer.add_if(!s.size_axis(), 30, "no size split");
                scorer.add_if(
                    s.has(Lot) || s.has(Order) || s.has(Buyer) || s.has(Date),
                    10,
                    "lot/order/buyer/date column",
                );
                scorer.add_if(s.any_numeric, 10, "numeric sample cell");
                s.present(&[Pieces, Color, Article, Lot, Order, Buyer, Date])
            }
            FormatType::SizeColorMatrix => {
                let color_axis = s.has(Color) || s.vertical_colors > 0;
                let pure_matrix = !s.has(Layers)
                    && s.present(&[Lot, Article, Fabric, Consumption]).is_empty();
                scorer.add_if(s.size_axis(), 35, "size axis");
                scorer.add_if(s.size_axis() && color_axis, 25, "color axis");
                scorer.add_if(s.any_numeric, 20, "numeric sample cell");
                scorer.add_if(pure_matrix, 20, "plain matrix without lay metadata");
                s.present(&[Color, SizeToken, Pieces])
            }
            FormatType::LayeredCutting => {
                let structured = s.has(Color) || s.size_axis() || s.has(Pieces);
                scorer.add_if(s.pieces_text_hit, 40, "'<n> pcs' text");
                scorer.add_if(s.layer_text_hit, 30, "'<n> layers' text");
                scorer.add_if(!structured, 20, "no structured columns");
                scorer.add_if(
                    s.has(Layers) || s.has(Cutter) || s.has(Shift),
                    10,
                    "layers/cutter/shift column",
                );
                s.present(&[Layers, Cutter, Shift])
            }
            FormatType::BatchWiseData => {
                scorer.add_if(s.has(Lot) || s.has(Order), 30, "lot/order column");
                scorer.add_if(s.has(Pieces), 25, "pieces/total column");
                scorer.add_if(s.has(Date) || s.has(Shift), 20, "date/shift column");
                scorer.add_if(!s.size_axis(), 15, "no size split");
                scorer.add_if(s.any_numeric, 10, "numeric sample cell");
                s.present(&[Lot, Order, Pieces, Date, Shift])
            }
            FormatType::Generic => Vec::new(),
        };

        scorer.finish(format_type, roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(format_type: FormatType, score: u32) -> FormatCandidate {
        FormatCandidate {
            format_type,
            score,
            confidence: score as f64 / 100.0,
            matched_roles: vec![],
            reasons: vec![],
        }
    }

    #[test]
    fn test_detect_horizontal_matrix() {
        let grid = RawGrid::from_rows(vec![
            vec!["Color", "XS", "S", "M", "L"],
            vec!["Blue", "10", "20", "15", "5"],
        ]);
        let report = FormatDetector::detect(&grid);

        assert_eq!(report.selected.format_type, FormatType::SizeColorMatrix);
        assert_eq!(report.candidates.len(), 5);
        // cutting_sheet 恰好 0.6, 不超过阈值被丢弃
        assert_eq!(report.candidates[0].score, 60);
        assert_eq!(report.size_columns.len(), 4);
    }

    #[test]
    fn test_detect_cutting_sheet() {
        let grid = RawGrid::from_rows(vec![
            vec!["Lot", "Article", "Color", "Layers", "S", "M", "L", "Fabric"],
            vec!["L-101", "TS-01", "Red", "20", "40", "60", "40", "Jersey"],
        ]);
        let report = FormatDetector::detect(&grid);

        assert_eq!(report.selected.format_type, FormatType::CuttingSheet);
        assert_eq!(report.selected.score, 95);
        assert!(report.selected.matched_roles.contains(&ColumnRole::Layers));
    }

    #[test]
    fn test_detect_vertical_and_detailed_as_matrix() {
        let vertical = RawGrid::from_rows(vec![vec!["Size", "Red", "Blue"], vec!["S", "5", "7"]]);
        assert_eq!(
            FormatDetector::detect(&vertical).selected.format_type,
            FormatType::SizeColorMatrix
        );

        let detailed = RawGrid::from_rows(vec![
            vec!["Color", "Size", "Pieces"],
            vec!["Green", "L", "40"],
        ]);
        let report = FormatDetector::detect(&detailed);
        assert_eq!(report.selected.format_type, FormatType::SizeColorMatrix);
        // production_summary 得分 60, 被阈值丢弃
        assert_eq!(report.candidates[1].score, 60);
    }

    #[test]
    fn test_detect_summary_prefers_first_declared_on_tie() {
        let grid = RawGrid::from_rows(vec![
            vec!["Lot", "Date", "Color", "Total Pcs"],
            vec!["B-7", "01/02/2025", "Maroon", "240"],
        ]);
        let report = FormatDetector::detect(&grid);

        let summary = &report.candidates[1];
        let batch = &report.candidates[4];
        assert_eq!(summary.score, 100);
        assert_eq!(batch.score, 100);
        assert_eq!(report.selected.format_type, FormatType::ProductionSummary);
    }

    #[test]
    fn test_detect_free_text() {
        let grid = RawGrid::from_rows(vec![
            vec!["Cutting notes"],
            vec!["Red 20 pcs M, 5 layers"],
        ]);
        let report = FormatDetector::detect(&grid);
        assert_eq!(report.selected.format_type, FormatType::LayeredCutting);
    }

    #[test]
    fn test_detect_generic_when_nothing_survives() {
        let grid = RawGrid::from_rows(vec![vec!["Remarks"], vec!["ok"]]);
        let report = FormatDetector::detect(&grid);
        assert_eq!(report.selected.format_type, FormatType::Generic);
        assert_eq!(report.selected.confidence, 0.0);
    }

    #[test]
    fn test_select_tie_break_declaration_order() {
        let candidates = vec![
            candidate(FormatType::CuttingSheet, 70),
            candidate(FormatType::ProductionSummary, 85),
            candidate(FormatType::SizeColorMatrix, 85),
            candidate(FormatType::LayeredCutting, 10),
            candidate(FormatType::BatchWiseData, 85),
        ];
        let selected = FormatDetector::select(&candidates, 0.6).unwrap();
        assert_eq!(selected.format_type, FormatType::ProductionSummary);
    }

    #[test]
    fn test_select_threshold_is_exclusive() {
        let candidates = vec![candidate(FormatType::CuttingSheet, 60)];
        assert!(FormatDetector::select(&candidates, 0.6).is_none());

        let candidates = vec![candidate(FormatType::CuttingSheet, 61)];
        assert!(FormatDetector::select(&candidates, 0.6).is_some());
    }
}
