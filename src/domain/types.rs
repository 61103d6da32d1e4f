// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 领域类型定义
// ==========================================
// 职责: 列角色 / 格式类型 / 机型 / 状态等枚举
// 红线: 纯数据类型, 不含匹配表与业务规则
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 列角色 (Column Role)
// ==========================================
// 表头经 ColumnClassifier 识别后的语义角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    Color,        // 颜色
    SizeToken,    // 尺码（"Size" 列或尺码本身作为表头）
    Lot,          // 批号
    Article,      // 款号
    Buyer,        // 客户
    Order,        // 订单号
    Fabric,       // 面料
    FabricWeight, // 克重
    Consumption,  // 单耗
    Layers,       // 层数
    Pieces,       // 件数/合计
    Date,         // 日期
    Shift,        // 班次
    Cutter,       // 裁剪工
    Unknown,      // 未识别
}

impl ColumnRole {
    /// 角色的稳定名称（用于元数据键与日志）
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Color => "color",
            ColumnRole::SizeToken => "size",
            ColumnRole::Lot => "lot",
            ColumnRole::Article => "article",
            ColumnRole::Buyer => "buyer",
            ColumnRole::Order => "order",
            ColumnRole::Fabric => "fabric",
            ColumnRole::FabricWeight => "fabricWeight",
            ColumnRole::Consumption => "consumption",
            ColumnRole::Layers => "layers",
            ColumnRole::Pieces => "pieces",
            ColumnRole::Date => "date",
            ColumnRole::Shift => "shift",
            ColumnRole::Cutter => "cutter",
            ColumnRole::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 表格格式 (Format Type)
// ==========================================
// 声明顺序即平局裁决顺序（Generic 不参与评分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatType {
    CuttingSheet,
    ProductionSummary,
    SizeColorMatrix,
    LayeredCutting,
    BatchWiseData,
    Generic,
}

impl FormatType {
    /// 参与评分的格式假设（固定声明顺序）
    pub const SCORED: [FormatType; 5] = [
        FormatType::CuttingSheet,
        FormatType::ProductionSummary,
        FormatType::SizeColorMatrix,
        FormatType::LayeredCutting,
        FormatType::BatchWiseData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::CuttingSheet => "cutting_sheet",
            FormatType::ProductionSummary => "production_summary",
            FormatType::SizeColorMatrix => "size_color_matrix",
            FormatType::LayeredCutting => "layered_cutting",
            FormatType::BatchWiseData => "batch_wise_data",
            FormatType::Generic => "generic",
        }
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 解析策略 (Parse Strategy)
// ==========================================
// 实际用于抽取数据的策略, 随数据集输出便于审计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    Horizontal, // 一行一色, 尺码为列
    Vertical,   // 一行一码, 颜色为列
    Detailed,   // 一行一个 (颜色, 尺码, 件数)
    Summary,    // 汇总件数, 无尺码拆分
    FreeText,   // 自由文本正则抽取
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseStrategy::Horizontal => "horizontal",
            ParseStrategy::Vertical => "vertical",
            ParseStrategy::Detailed => "detailed",
            ParseStrategy::Summary => "summary",
            ParseStrategy::FreeText => "free_text",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// 机型 (Machine Type)
// ==========================================
// 别名归一化见 engine::machine_compat
// 序列化格式: 规范标签字符串（如 "single-needle"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MachineType {
    SingleNeedle,
    Overlock,
    Flatlock,
    Kansai,
    Buttonhole,
    DoubleNeedle,
    Cutting,
    Pressing,
    Inspection,
    Manual,
    MultiSkill,
    /// 未收录的自定义机型（保留归一化后的文本）
    Unrecognized(String),
}

impl MachineType {
    /// 全部规范机型（不含 Unrecognized）
    pub const CANONICAL: [MachineType; 11] = [
        MachineType::SingleNeedle,
        MachineType::Overlock,
        MachineType::Flatlock,
        MachineType::Kansai,
        MachineType::Buttonhole,
        MachineType::DoubleNeedle,
        MachineType::Cutting,
        MachineType::Pressing,
        MachineType::Inspection,
        MachineType::Manual,
        MachineType::MultiSkill,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            MachineType::SingleNeedle => "single-needle",
            MachineType::Overlock => "overlock",
            MachineType::Flatlock => "flatlock",
            MachineType::Kansai => "kansai",
            MachineType::Buttonhole => "buttonhole",
            MachineType::DoubleNeedle => "double-needle",
            MachineType::Cutting => "cutting",
            MachineType::Pressing => "pressing",
            MachineType::Inspection => "inspection",
            MachineType::Manual => "manual",
            MachineType::MultiSkill => "multi-skill",
            MachineType::Unrecognized(text) => text.as_str(),
        }
    }

    /// 按规范标签精确还原（不做别名匹配）
    pub fn from_label(label: &str) -> Self {
        Self::CANONICAL
            .iter()
            .find(|m| m.as_str() == label)
            .cloned()
            .unwrap_or_else(|| MachineType::Unrecognized(label.to_string()))
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, MachineType::Unrecognized(_))
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for MachineType {
    fn from(value: String) -> Self {
        MachineType::from_label(&value)
    }
}

impl From<MachineType> for String {
    fn from(value: MachineType) -> Self {
        value.as_str().to_string()
    }
}

// ==========================================
// 严重程度 / 置信度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

// ==========================================
// 工序子扎包状态 (Sub-Bundle Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubBundleStatus {
    Pending,    // 等待前序工序
    Ready,      // 可分配
    Assigned,   // 已分配操作工
    InProgress, // 生产中
    Completed,  // 已完成
}

impl fmt::Display for SubBundleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubBundleStatus::Pending => write!(f, "pending"),
            SubBundleStatus::Ready => write!(f, "ready"),
            SubBundleStatus::Assigned => write!(f, "assigned"),
            SubBundleStatus::InProgress => write!(f, "in-progress"),
            SubBundleStatus::Completed => write!(f, "completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&FormatType::SizeColorMatrix).unwrap(),
            "\"size_color_matrix\""
        );
        assert_eq!(FormatType::BatchWiseData.to_string(), "batch_wise_data");
    }

    #[test]
    fn test_machine_type_serde_uses_label() {
        let json = serde_json::to_string(&MachineType::SingleNeedle).unwrap();
        assert_eq!(json, "\"single-needle\"");

        let back: MachineType = serde_json::from_str("\"multi-skill\"").unwrap();
        assert_eq!(back, MachineType::MultiSkill);

        let custom: MachineType = serde_json::from_str("\"zigzag\"").unwrap();
        assert_eq!(custom, MachineType::Unrecognized("zigzag".to_string()));
        assert!(!custom.is_recognized());
    }

    #[test]
    fn test_sub_bundle_status_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SubBundleStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(SubBundleStatus::InProgress.to_string(), "in-progress");
    }
}
