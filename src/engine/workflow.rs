// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 工序流转
// ==========================================
// 职责: 扎包按工序路线展开为子扎包, 管理子扎包状态流转
// 状态: pending → ready → assigned → in-progress → completed
// 规则: 每个扎包第 1 道工序为 ready, 其余为 pending;
//       前序完成后后继工序转为 ready
// 红线: 依赖链为线性链, 只在同一扎包内
// ==========================================

use crate::domain::bundle::{Bundle, WorkflowSubBundle};
use crate::domain::types::SubBundleStatus;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("子扎包不存在: {0}")]
    NotFound(String),

    #[error("子扎包 {id} 状态为 {from}, 不允许执行 {action}")]
    InvalidTransition {
        id: String,
        from: SubBundleStatus,
        action: &'static str,
    },
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// 子扎包编号: {bundle_id}-S{step_index}
pub fn sub_bundle_id(bundle_id: &str, step_index: u32) -> String {
    format!("{}-S{}", bundle_id, step_index)
}

// ==========================================
// ProductionWorkflow - 纯函数工具类
// ==========================================
pub struct ProductionWorkflow;

impl ProductionWorkflow {
    /// 展开扎包为工序子扎包（扎包顺序 × 工序顺序）
    pub fn create(bundles: &[Bundle]) -> Vec<WorkflowSubBundle> {
        let mut subs = Vec::new();

        for bundle in bundles {
            let step_count = bundle.process_steps.len();
            for (idx, step) in bundle.process_steps.iter().enumerate() {
                let step_index = idx as u32 + 1;
                let depends_on = (idx > 0).then(|| sub_bundle_id(&bundle.id, step_index - 1));
                let next_step =
                    (idx + 1 < step_count).then(|| sub_bundle_id(&bundle.id, step_index + 1));

                subs.push(WorkflowSubBundle {
                    id: sub_bundle_id(&bundle.id, step_index),
                    bundle_id: bundle.id.clone(),
                    step_index,
                    operation: step.operation.clone(),
                    machine_type: step.machine_type.clone(),
                    piece_count: bundle.piece_count,
                    rate: step.rate,
                    time_minutes: step.time_minutes,
                    depends_on,
                    next_step,
                    status: if idx == 0 {
                        SubBundleStatus::Ready
                    } else {
                        SubBundleStatus::Pending
                    },
                    assigned_operator: None,
                });
            }
        }

        debug!(bundles = bundles.len(), sub_bundles = subs.len(), "工序子扎包已展开");
        subs
    }

    /// 当前可分配的子扎包
    pub fn ready_sub_bundles(subs: &[WorkflowSubBundle]) -> Vec<&WorkflowSubBundle> {
        subs.iter()
            .filter(|s| s.status == SubBundleStatus::Ready)
            .collect()
    }

    /// 分配操作工: ready → assigned
    pub fn assign(
        subs: &mut [WorkflowSubBundle],
        sub_bundle_id: &str,
        operator_id: &str,
    ) -> WorkflowResult<()> {
        let sub = Self::transition(
            subs,
            sub_bundle_id,
            SubBundleStatus::Ready,
            SubBundleStatus::Assigned,
            "assign",
        )?;
        sub.assigned_operator = Some(operator_id.to_string());
        Ok(())
    }

    /// 开工: assigned → in-progress
    pub fn start(subs: &mut [WorkflowSubBundle], sub_bundle_id: &str) -> WorkflowResult<()> {
        Self::transition(
            subs,
            sub_bundle_id,
            SubBundleStatus::Assigned,
            SubBundleStatus::InProgress,
            "start",
        )?;
        Ok(())
    }

    /// 完工: in-progress → completed, 后继工序 pending → ready
    pub fn complete(subs: &mut [WorkflowSubBundle], sub_bundle_id: &str) -> WorkflowResult<()> {
        let next_step = Self::transition(
            subs,
            sub_bundle_id,
            SubBundleStatus::InProgress,
            SubBundleStatus::Completed,
            "complete",
        )?
        .next_step
        .clone();

        if let Some(next_id) = next_step {
            if let Some(next) = subs
                .iter_mut()
                .find(|s| s.id == next_id && s.status == SubBundleStatus::Pending)
            {
                next.status = SubBundleStatus::Ready;
                debug!(sub_bundle_id = %next.id, "后继工序已就绪");
            }
        }
        Ok(())
    }

    fn transition<'a>(
        subs: &'a mut [WorkflowSubBundle],
        sub_bundle_id: &str,
        from: SubBundleStatus,
        to: SubBundleStatus,
        action: &'static str,
    ) -> WorkflowResult<&'a mut WorkflowSubBundle> {
        let sub = subs
            .iter_mut()
            .find(|s| s.id == sub_bundle_id)
            .ok_or_else(|| WorkflowError::NotFound(sub_bundle_id.to_string()))?;

        if sub.status != from {
            return Err(WorkflowError::InvalidTransition {
                id: sub.id.clone(),
                from: sub.status,
                action,
            });
        }
        sub.status = to;
        Ok(sub)
    }
}
