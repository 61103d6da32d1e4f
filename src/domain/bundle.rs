// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 扎包领域模型
// ==========================================
// 用途: BundleGenerator 输出, 交由外部持久层保存
// 不变量: piece_count <= max_bundle_size（合并余量的扎包除外）
// ==========================================

use crate::domain::types::{MachineType, SubBundleStatus};
use serde::{Deserialize, Serialize};

/// 默认扎包命名模板
pub const DEFAULT_NAMING_FORMAT: &str = "{lot}-{color}-{size}-{sequence}";
pub const DEFAULT_GARMENT_TYPE: &str = "tshirt";
pub const DEFAULT_MAX_BUNDLE_SIZE: u32 = 30;
pub const DEFAULT_MIN_BUNDLE_SIZE: u32 = 15;

// ==========================================
// BundleOptions - 扎包参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleOptions {
    pub garment_type: String,
    pub max_bundle_size: u32,
    pub min_bundle_size: u32,
    pub bundle_naming_format: String,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            garment_type: DEFAULT_GARMENT_TYPE.to_string(),
            max_bundle_size: DEFAULT_MAX_BUNDLE_SIZE,
            min_bundle_size: DEFAULT_MIN_BUNDLE_SIZE,
            bundle_naming_format: DEFAULT_NAMING_FORMAT.to_string(),
        }
    }
}

// ==========================================
// PartSpec - 裁片明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartSpec {
    pub name: String,
    pub quantity_per_garment: u32, // 每件成衣所需裁片数
    pub total_quantity: u32,       // 本扎包裁片总数
}

// ==========================================
// ProcessStep - 工序
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStep {
    pub step_index: u32, // 从 1 开始
    pub operation: String,
    pub machine_type: MachineType,
    pub rate: f64,         // 单件工价
    pub time_minutes: f64, // 单件标准工时（分钟）
}

// ==========================================
// Bundle - 生产扎包
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    pub lot_number: String,
    pub article: String,
    pub color: String,
    pub size: String,
    pub piece_count: u32,
    pub layers_used: u32,
    pub pieces_per_layer: u32,
    pub bundle_sequence: u32, // 同 (颜色, 尺码) 内序号
    pub global_sequence: u32, // 全局序号
    pub merged_remainder: bool,
    pub parts: Vec<PartSpec>,
    pub process_steps: Vec<ProcessStep>,
    pub estimated_time: f64,
    pub estimated_cost: f64,
    pub fabric_consumption: f64,
}

// ==========================================
// WorkflowSubBundle - 工序子扎包
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSubBundle {
    pub id: String, // {bundle_id}-S{step_index}
    pub bundle_id: String,
    pub step_index: u32,
    pub operation: String,
    pub machine_type: MachineType,
    pub piece_count: u32,
    pub rate: f64,
    pub time_minutes: f64,
    pub depends_on: Option<String>,
    pub next_step: Option<String>,
    pub status: SubBundleStatus,
    pub assigned_operator: Option<String>,
}

// ==========================================
// BundleSummary - 扎包汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSummary {
    pub total_bundles: usize,
    pub total_pieces: u32,
    pub by_color: Vec<QuantityTotal>,
    pub by_size: Vec<QuantityTotal>,
    pub total_estimated_time: f64,
    pub total_estimated_cost: f64,
    pub total_fabric_consumption: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityTotal {
    pub key: String,
    pub bundles: usize,
    pub pieces: u32,
}

// ==========================================
// GenerationMetadata / GenerationResult
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub requested_garment_type: String,
    pub garment_type: String,
    pub template_fallback: bool,
    pub max_bundle_size: u32,
    pub min_bundle_size: u32,
    pub naming_format: String,
    pub excluded_pieces: u32, // 不足整层被截断的件数
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub bundles: Vec<Bundle>,
    pub summary: BundleSummary,
    pub metadata: GenerationMetadata,
}
