// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 引擎层
// ==========================================
// 职责: 扎包生成、工序流转、机型兼容性校验
// 红线: 引擎为纯函数, 不做 I/O, 所有结论必须给出 reason
// ==========================================

pub mod bundle_generator;
pub mod garment_template;
pub mod machine_compat;
pub mod workflow;

// 重导出核心引擎
pub use bundle_generator::{
    BundleGenerator, BundleIdParts, BundleSlice, GeneratorError, GeneratorResult, LayerPlan,
};
pub use garment_template::{GarmentTemplate, DEFAULT_FABRIC_RATE};
pub use machine_compat::{display_label, normalize_machine_type, MachineCompatibility};
pub use workflow::{ProductionWorkflow, WorkflowError, WorkflowResult};
