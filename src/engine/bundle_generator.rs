// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 扎包生成引擎
// ==========================================
// 职责: 将规范数据集按 (颜色, 尺码) 拆分为生产扎包
// 输入: WipDataset + BundleOptions
// 输出: GenerationResult（扎包 + 汇总 + 生成元数据）
// ==========================================
// 规则:
// - 每层件数 = floor(合计 / 层数), 层数为 0 时按 1 件/层
// - 可成衣件数 = min(合计, 层数 × 每层件数), 不足整层的余量截断
// - 按上限依次切包, 共 ceil(可成衣件数 / 上限) 包
// - 末包少于下限时并入同一 (颜色, 尺码) 的前一包, 合并包 < 上限 + 下限
// 红线: 合并只在同一 (颜色, 尺码) 内进行
// ==========================================

use crate::domain::bundle::{
    Bundle, BundleOptions, BundleSummary, GenerationMetadata, GenerationResult, QuantityTotal,
    WorkflowSubBundle,
};
use crate::domain::wip::WipDataset;
use crate::engine::garment_template::GarmentTemplate;
use crate::engine::workflow::ProductionWorkflow;
use crate::perf::PerfGuard;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// 批号/款号缺失时的占位符
const MISSING_PLACEHOLDER: &str = "NA";

/// 颜色片段最大长度
const COLOR_CODE_MAX_CHARS: usize = 8;

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("扎包参数无效: {0}")]
    InvalidOptions(String),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

// ==========================================
// LayerPlan - 单个 (颜色, 尺码) 的铺布推算
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerPlan {
    pub pieces_per_layer: u32,
    pub actual_garment_count: u32,
    pub excluded_pieces: u32,
}

impl LayerPlan {
    /// 推算每层件数与可成衣件数
    ///
    /// # 规则
    /// - layers == 0 → 每层 1 件, 可用件数 = 0 × 1, 全部计入截断
    /// - 合计 < 层数 → 每层 0 件, 无可用件数
    pub fn compute(total: u32, layers: u32) -> Self {
        let pieces_per_layer = if layers == 0 { 1 } else { total / layers };
        let actual_garment_count = total.min(layers.saturating_mul(pieces_per_layer));

        Self {
            pieces_per_layer,
            actual_garment_count,
            excluded_pieces: total - actual_garment_count,
        }
    }
}

/// 单包切分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleSlice {
    pub piece_count: u32,
    pub merged_remainder: bool,
}

// ==========================================
// BundleGenerator - 纯函数工具类
// ==========================================
pub struct BundleGenerator;

impl BundleGenerator {
    /// 生成扎包
    ///
    /// # 参数
    /// - dataset: 规范数据集
    /// - options: 款式、扎包上下限、命名模板
    ///
    /// # 返回
    /// - Ok(GenerationResult)
    /// - Err(InvalidOptions): 上限为 0 或下限大于上限
    #[instrument(skip(dataset, options), fields(garment_type = %options.garment_type))]
    pub fn generate(
        dataset: &WipDataset,
        options: &BundleOptions,
    ) -> GeneratorResult<GenerationResult> {
        let _perf = PerfGuard::new("bundle_generate");
        Self::validate_options(options)?;

        let (template, template_fallback) = GarmentTemplate::resolve(&options.garment_type);
        let lot = dataset.metadata_value("lot").unwrap_or(MISSING_PLACEHOLDER);
        let article = dataset.metadata_value("article").unwrap_or(MISSING_PLACEHOLDER);

        let mut bundles: Vec<Bundle> = Vec::new();
        let mut excluded_pieces = 0u32;
        let mut global_sequence = 0u32;

        for color in &dataset.colors {
            for (size, total) in color.pieces_by_size.iter() {
                let plan = LayerPlan::compute(total, color.layers);
                if plan.excluded_pieces > 0 {
                    debug!(
                        color = %color.name,
                        size,
                        excluded = plan.excluded_pieces,
                        "不足整层件数已截断"
                    );
                }
                excluded_pieces = excluded_pieces.saturating_add(plan.excluded_pieces);

                // 每个 (颜色, 尺码) 独立切分, 合并不会越过分组边界
                let slices = Self::split_slices(
                    plan.actual_garment_count,
                    options.max_bundle_size,
                    options.min_bundle_size,
                );

                for (idx, slice) in slices.iter().enumerate() {
                    global_sequence += 1;
                    let bundle_sequence = idx as u32 + 1;
                    let count = slice.piece_count;

                    let id = Self::format_bundle_id(
                        &options.bundle_naming_format,
                        &BundleIdParts {
                            lot,
                            article,
                            color: &color.name,
                            size,
                            sequence: bundle_sequence,
                            global_sequence,
                        },
                    );

                    bundles.push(Bundle {
                        id,
                        lot_number: lot.to_string(),
                        article: article.to_string(),
                        color: color.name.clone(),
                        size: size.to_string(),
                        piece_count: count,
                        layers_used: count.div_ceil(plan.pieces_per_layer.max(1)),
                        pieces_per_layer: plan.pieces_per_layer,
                        bundle_sequence,
                        global_sequence,
                        merged_remainder: slice.merged_remainder,
                        parts: template.parts_for(count),
                        process_steps: template.process_steps(),
                        estimated_time: round2(template.time_per_garment() * count as f64),
                        estimated_cost: round2(template.rate_per_garment() * count as f64),
                        fabric_consumption: round2(template.fabric_rate(size) * count as f64),
                    });
                }
            }
        }

        Self::warn_duplicate_ids(&bundles);

        let summary = Self::summarize(&bundles);
        info!(
            bundles = summary.total_bundles,
            pieces = summary.total_pieces,
            excluded_pieces,
            template = template.garment_type,
            "扎包生成完成"
        );

        Ok(GenerationResult {
            bundles,
            summary,
            metadata: GenerationMetadata {
                requested_garment_type: options.garment_type.clone(),
                garment_type: template.garment_type.to_string(),
                template_fallback,
                max_bundle_size: options.max_bundle_size,
                min_bundle_size: options.min_bundle_size,
                naming_format: options.bundle_naming_format.clone(),
                excluded_pieces,
            },
        })
    }

    /// 将扎包展开为工序子扎包
    pub fn create_production_workflow(bundles: &[Bundle]) -> Vec<WorkflowSubBundle> {
        ProductionWorkflow::create(bundles)
    }

    fn validate_options(options: &BundleOptions) -> GeneratorResult<()> {
        if options.max_bundle_size == 0 {
            return Err(GeneratorError::InvalidOptions(
                "max_bundle_size 必须大于 0".to_string(),
            ));
        }
        if options.min_bundle_size > options.max_bundle_size {
            return Err(GeneratorError::InvalidOptions(format!(
                "min_bundle_size ({}) 不能大于 max_bundle_size ({})",
                options.min_bundle_size, options.max_bundle_size
            )));
        }
        Ok(())
    }

    /// 切分单个 (颜色, 尺码) 的可用件数
    ///
    /// # 规则
    /// 1. 依次切出 min(max, 剩余件数), 只有末包可能不足 max
    /// 2. 末包少于 min 且存在前一包时并入前一包并标记 merged_remainder
    pub fn split_slices(count: u32, max: u32, min: u32) -> Vec<BundleSlice> {
        if count == 0 || max == 0 {
            return Vec::new();
        }

        let mut slices: Vec<BundleSlice> = Vec::new();
        let mut remaining = count;
        while remaining > 0 {
            let piece_count = remaining.min(max);
            remaining -= piece_count;
            match slices.last_mut() {
                Some(prev) if piece_count < min => {
                    prev.piece_count = prev.piece_count.saturating_add(piece_count);
                    prev.merged_remainder = true;
                }
                _ => slices.push(BundleSlice {
                    piece_count,
                    merged_remainder: false,
                }),
            }
        }
        slices
    }

    /// 按命名模板生成扎包编号
    ///
    /// # 占位符
    /// {lot} {article} {color} {size} {sequence} {globalSequence}
    pub fn format_bundle_id(format: &str, parts: &BundleIdParts<'_>) -> String {
        format
            .replace("{lot}", non_empty_or_na(parts.lot))
            .replace("{article}", non_empty_or_na(parts.article))
            .replace("{color}", &color_code(parts.color))
            .replace("{size}", parts.size.trim())
            .replace("{sequence}", &parts.sequence.to_string())
            .replace("{globalSequence}", &format!("{:03}", parts.global_sequence))
    }

    /// 汇总（按颜色、尺码首次出现顺序）
    pub fn summarize(bundles: &[Bundle]) -> BundleSummary {
        let mut by_color: Vec<QuantityTotal> = Vec::new();
        let mut by_size: Vec<QuantityTotal> = Vec::new();

        for bundle in bundles {
            add_total(&mut by_color, &bundle.color, bundle.piece_count);
            add_total(&mut by_size, &bundle.size, bundle.piece_count);
        }

        BundleSummary {
            total_bundles: bundles.len(),
            total_pieces: bundles
                .iter()
                .fold(0u32, |acc, b| acc.saturating_add(b.piece_count)),
            by_color,
            by_size,
            total_estimated_time: round2(bundles.iter().map(|b| b.estimated_time).sum()),
            total_estimated_cost: round2(bundles.iter().map(|b| b.estimated_cost).sum()),
            total_fabric_consumption: round2(bundles.iter().map(|b| b.fabric_consumption).sum()),
        }
    }

    fn warn_duplicate_ids(bundles: &[Bundle]) {
        let mut seen = HashSet::new();
        for bundle in bundles {
            if !seen.insert(bundle.id.as_str()) {
                warn!(bundle_id = %bundle.id, "扎包编号重复, 请检查命名模板");
            }
        }
    }
}

/// 命名模板的占位符取值
#[derive(Debug, Clone, Copy)]
pub struct BundleIdParts<'a> {
    pub lot: &'a str,
    pub article: &'a str,
    pub color: &'a str,
    pub size: &'a str,
    pub sequence: u32,
    pub global_sequence: u32,
}

/// 颜色编码: 仅保留 ASCII 字母数字与天城文, 截取前 8 个字符, 大写
pub fn color_code(color: &str) -> String {
    let code: String = color
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || ('\u{0900}'..='\u{097F}').contains(c))
        .take(COLOR_CODE_MAX_CHARS)
        .collect();
    let code = code.to_uppercase();
    if code.is_empty() {
        MISSING_PLACEHOLDER.to_string()
    } else {
        code
    }
}

fn non_empty_or_na(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        MISSING_PLACEHOLDER
    } else {
        value
    }
}

fn add_total(totals: &mut Vec<QuantityTotal>, key: &str, pieces: u32) {
    match totals.iter_mut().find(|t| t.key == key) {
        Some(total) => {
            total.bundles += 1;
            total.pieces = total.pieces.saturating_add(pieces);
        }
        None => totals.push(QuantityTotal {
            key: key.to_string(),
            bundles: 1,
            pieces,
        }),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
