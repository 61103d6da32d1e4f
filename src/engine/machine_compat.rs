// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 机型兼容性校验
// ==========================================
// 职责: 自由文本机型归一化, 操作工与工作项的机型匹配, 派工校验
// 规则: 任一方缺机型 → 不兼容 (medium)
//       操作工为多能工 → 兼容 (high confidence)
//       规范机型一致 → 兼容
//       其他 → 不兼容 (high), 原因中给出双方机型
// 红线: 只返回结构化结论, 不返回错误
// ==========================================

use crate::domain::assignment::{
    AssignmentChecks, AssignmentValidation, CompatibilityResult, Operator, WorkItem,
    STATUS_AVAILABLE,
};
use crate::domain::types::{Confidence, MachineType, Severity};
use tracing::debug;

// ==========================================
// 机型别名表（已归一化: 小写、去分隔符）
// ==========================================
static MACHINE_ALIASES: [(MachineType, &[&str]); 11] = [
    (
        MachineType::SingleNeedle,
        &["singleneedle", "sn", "snls", "lockstitch", "singleneedlelockstitch", "plain", "plainmachine"],
    ),
    (
        MachineType::Overlock,
        &["overlock", "ol", "serger", "overedge", "4thread", "5thread", "safetystitch"],
    ),
    (
        MachineType::Flatlock,
        &["flatlock", "fl", "coverstitch", "interlock", "flatseamer"],
    ),
    (
        MachineType::Kansai,
        &["kansai", "kansaispecial", "multineedle", "waistband", "feedoffarm", "foa"],
    ),
    (
        MachineType::Buttonhole,
        &["buttonhole", "bh", "buttonholing", "buttonstitch", "buttonattach", "button"],
    ),
    (
        MachineType::DoubleNeedle,
        &["doubleneedle", "dn", "dnls", "twinneedle", "twoneedle"],
    ),
    (
        MachineType::Cutting,
        &["cutting", "cutter", "straightknife", "bandknife", "cuttingtable"],
    ),
    (
        MachineType::Pressing,
        &["pressing", "press", "iron", "ironing", "steampress", "finishing"],
    ),
    (
        MachineType::Inspection,
        &["inspection", "qc", "checking", "quality", "qualitycheck"],
    ),
    (
        MachineType::Manual,
        &["manual", "hand", "handwork", "thread", "threadcutting", "trimming"],
    ),
    (
        MachineType::MultiSkill,
        &["multiskill", "multi", "allrounder", "allround", "multimachine", "versatile"],
    ),
];

/// 归一化文本: 只保留字母数字并小写
fn canonical_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// 自由文本机型 → 规范机型
///
/// # 返回
/// - None: 不含字母数字的文本
/// - Some(MachineType::Unrecognized(归一化文本)): 别名表未收录
pub fn normalize_machine_type(text: &str) -> Option<MachineType> {
    let key = canonical_text(text);
    if key.is_empty() {
        return None;
    }

    let matched = MACHINE_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&key.as_str()))
        .map(|(machine, _)| machine.clone());

    Some(matched.unwrap_or(MachineType::Unrecognized(key)))
}

/// 界面显示名称
pub fn display_label(machine: &MachineType) -> String {
    match machine {
        MachineType::SingleNeedle => "Single Needle".to_string(),
        MachineType::Overlock => "Overlock".to_string(),
        MachineType::Flatlock => "Flatlock".to_string(),
        MachineType::Kansai => "Kansai".to_string(),
        MachineType::Buttonhole => "Buttonhole".to_string(),
        MachineType::DoubleNeedle => "Double Needle".to_string(),
        MachineType::Cutting => "Cutting".to_string(),
        MachineType::Pressing => "Pressing".to_string(),
        MachineType::Inspection => "Inspection".to_string(),
        MachineType::Manual => "Manual".to_string(),
        MachineType::MultiSkill => "Multi-Skill".to_string(),
        MachineType::Unrecognized(text) => text.clone(),
    }
}

fn resolve(text: Option<&str>) -> Option<MachineType> {
    text.and_then(normalize_machine_type)
}

// ==========================================
// MachineCompatibility - 纯函数工具类
// ==========================================
pub struct MachineCompatibility;

impl MachineCompatibility {
    /// 判断操作工能否承接工作项
    pub fn is_compatible(operator: &Operator, work_item: &WorkItem) -> CompatibilityResult {
        let operator_machine = resolve(operator.machine.as_deref());
        let required = resolve(work_item.machine_type.as_deref());

        let (operator_machine, required) = match (operator_machine, required) {
            (None, _) => {
                return CompatibilityResult {
                    compatible: false,
                    reason: format!("操作工 {} 未登记机型", operator.id),
                    severity: Some(Severity::Medium),
                    confidence: None,
                }
            }
            (_, None) => {
                return CompatibilityResult {
                    compatible: false,
                    reason: format!("工作项 {} 未指定机型", work_item.id),
                    severity: Some(Severity::Medium),
                    confidence: None,
                }
            }
            (Some(op), Some(req)) => (op, req),
        };

        if operator_machine == MachineType::MultiSkill {
            return CompatibilityResult {
                compatible: true,
                reason: format!("多能工可承接 {}", display_label(&required)),
                severity: None,
                confidence: Some(Confidence::High),
            };
        }

        if operator_machine == required {
            let confidence = if required.is_recognized() {
                Confidence::High
            } else {
                Confidence::Medium
            };
            return CompatibilityResult {
                compatible: true,
                reason: format!("机型一致: {}", display_label(&required)),
                severity: None,
                confidence: Some(confidence),
            };
        }

        CompatibilityResult {
            compatible: false,
            reason: format!(
                "机型不匹配: 操作工为 {}, 工作项需要 {}",
                display_label(&operator_machine),
                display_label(&required)
            ),
            severity: Some(Severity::High),
            confidence: Some(Confidence::High),
        }
    }

    /// 派工校验
    ///
    /// # 规则
    /// - 机型不兼容 → error
    /// - check_workload: current_load >= max_load → warning
    /// - check_availability: status != "available" → error
    pub fn validate_assignment(
        operator: &Operator,
        work_item: &WorkItem,
        checks: &AssignmentChecks,
    ) -> AssignmentValidation {
        let compatibility = Self::is_compatible(operator, work_item);
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !compatibility.compatible {
            errors.push(compatibility.reason.clone());
        }

        if checks.check_workload && operator.current_load >= operator.max_load {
            warnings.push(format!(
                "操作工 {} 负荷已满 ({}/{})",
                operator.id, operator.current_load, operator.max_load
            ));
        }

        if checks.check_availability
            && !operator.status.trim().eq_ignore_ascii_case(STATUS_AVAILABLE)
        {
            errors.push(format!(
                "操作工 {} 当前状态为 '{}', 不可派工",
                operator.id, operator.status
            ));
        }

        debug!(
            operator_id = %operator.id,
            work_item_id = %work_item.id,
            errors = errors.len(),
            warnings = warnings.len(),
            "派工校验完成"
        );

        AssignmentValidation {
            valid: errors.is_empty(),
            errors,
            warnings,
            compatibility,
        }
    }

    /// 可承接该工作项的操作工
    pub fn filter_compatible_operators<'a>(
        operators: &'a [Operator],
        work_item: &WorkItem,
    ) -> Vec<&'a Operator> {
        operators
            .iter()
            .filter(|op| Self::is_compatible(op, work_item).compatible)
            .collect()
    }

    /// 该操作工可承接的工作项
    pub fn filter_compatible_work_items<'a>(
        operator: &Operator,
        work_items: &'a [WorkItem],
    ) -> Vec<&'a WorkItem> {
        work_items
            .iter()
            .filter(|item| Self::is_compatible(operator, item).compatible)
            .collect()
    }
}
