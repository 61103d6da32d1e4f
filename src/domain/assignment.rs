// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 派工领域模型
// ==========================================
// 用途: 外部派工界面提交的 {操作工, 工作项} 与校验结果
// 红线: 每次校验重新计算, 不缓存
// ==========================================

use crate::domain::types::{Confidence, Severity};
use serde::{Deserialize, Serialize};

/// 操作工可派工状态
pub const STATUS_AVAILABLE: &str = "available";

// ==========================================
// Operator - 操作工
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Operator {
    pub id: String,
    pub name: String,
    pub machine: Option<String>, // 自由文本机型
    pub status: String,
    pub current_load: u32,
    pub max_load: u32,
}

// ==========================================
// WorkItem - 工作项（扎包工序）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkItem {
    pub id: String,
    pub operation: String,
    pub machine_type: Option<String>,
    pub piece_count: u32,
}

// ==========================================
// CompatibilityResult - 机型兼容性结论
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    pub compatible: bool,
    pub reason: String,
    pub severity: Option<Severity>,
    pub confidence: Option<Confidence>,
}

// ==========================================
// AssignmentChecks - 派工校验开关
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentChecks {
    pub check_workload: bool,
    pub check_availability: bool,
}

impl Default for AssignmentChecks {
    fn default() -> Self {
        Self {
            check_workload: true,
            check_availability: true,
        }
    }
}

// ==========================================
// AssignmentValidation - 派工校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub compatibility: CompatibilityResult,
}
