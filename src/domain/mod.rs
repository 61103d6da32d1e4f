// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 领域模型层
// ==========================================
// 职责: 定义表格、数据集、扎包、派工实体与类型
// 红线: 不含解析逻辑, 不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod bundle;
pub mod grid;
pub mod types;
pub mod wip;

// 重导出核心类型
pub use assignment::{
    AssignmentChecks, AssignmentValidation, CompatibilityResult, Operator, WorkItem,
};
pub use bundle::{
    Bundle, BundleOptions, BundleSummary, GenerationMetadata, GenerationResult, PartSpec,
    ProcessStep, QuantityTotal, WorkflowSubBundle,
};
pub use grid::RawGrid;
pub use types::{
    ColumnRole, Confidence, FormatType, MachineType, ParseStrategy, Severity, SubBundleStatus,
};
pub use wip::{ColorEntry, DatasetStatistics, SizeBreakdown, ValidationReport, WipDataset};
