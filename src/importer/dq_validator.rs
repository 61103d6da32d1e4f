// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 数据质量校验器实现
// ==========================================
// 职责: 规范数据集的结构校验
// 级别: ERROR 阻断下游使用; WARNING 仅提示
// 红线: 校验只返回报告, 不抛错、不修改数据集
// ==========================================

use crate::domain::wip::{ValidationReport, WipDataset};
use crate::importer::wip_importer_trait::DqValidator as DqValidatorTrait;
use std::collections::HashSet;

pub struct DqValidator;

impl DqValidator {
    /// ERROR: 无颜色 / 总件数 <= 0
    fn validate_structure(&self, dataset: &WipDataset) -> Vec<String> {
        let mut errors = Vec::new();
        if dataset.colors.is_empty() {
            errors.push("未识别到任何颜色数据".to_string());
        }
        if dataset.total_pieces == 0 {
            errors.push(format!("总件数必须大于 0 (当前: {})", dataset.total_pieces));
        }
        errors
    }

    /// WARNING: 颜色名为空 / 尺码明细为空 / 同名颜色重复
    fn validate_colors(&self, dataset: &WipDataset) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for (idx, color) in dataset.colors.iter().enumerate() {
            if color.name.trim().is_empty() {
                warnings.push(format!("第 {} 个颜色名称为空", idx + 1));
            }
            if color.pieces_by_size.is_empty() {
                warnings.push(format!("颜色 '{}' 无尺码件数明细", color.name));
            }
            if !seen.insert(color.name.as_str()) {
                warnings.push(format!("颜色 '{}' 重复出现", color.name));
            }
        }
        warnings
    }

    /// WARNING: 合计与明细不一致
    fn validate_totals(&self, dataset: &WipDataset) -> Vec<String> {
        let mut warnings = Vec::new();

        for color in &dataset.colors {
            let sum = color.pieces_by_size.total();
            if color.total != sum {
                warnings.push(format!(
                    "颜色 '{}' 合计 {} 与尺码明细之和 {} 不一致",
                    color.name, color.total, sum
                ));
            }
        }

        let sum = dataset
            .colors
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.total));
        if dataset.total_pieces != sum {
            warnings.push(format!(
                "总件数 {} 与各颜色合计之和 {} 不一致",
                dataset.total_pieces, sum
            ));
        }
        warnings
    }
}

impl DqValidatorTrait for DqValidator {
    fn validate(&self, dataset: &WipDataset) -> ValidationReport {
        let errors = self.validate_structure(dataset);
        let mut warnings = self.validate_colors(dataset);
        warnings.extend(self.validate_totals(dataset));

        ValidationReport::new(errors, warnings)
    }
}
