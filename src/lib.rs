// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 核心库
// ==========================================
// 职责: 裁剪车间表格导入 → 规范 WIP 数据集 → 生产扎包 → 工序派工校验
// 技术栈: Rust (纯函数核心, 无持久化)
// 系统定位: 表格来源与持久化由调用方负责
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 格式检测与解析
pub mod importer;

// 引擎层 - 扎包与派工
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ColumnRole, Confidence, FormatType, MachineType, ParseStrategy, Severity, SubBundleStatus,
};

// 领域实体
pub use domain::{
    AssignmentChecks, AssignmentValidation, Bundle, BundleOptions, BundleSummary, ColorEntry,
    CompatibilityResult, DatasetStatistics, GenerationResult, Operator, RawGrid, SizeBreakdown,
    ValidationReport, WipDataset, WorkItem, WorkflowSubBundle,
};

// 导入
pub use importer::{
    ColumnClassifier, CsvGridParser, FormatDetector, ImportError, ImportOutcome, ImportResult,
    WipImporter, WipImporterImpl,
};

// 引擎
pub use engine::{BundleGenerator, GarmentTemplate, MachineCompatibility, ProductionWorkflow};

// 配置
pub use config::ConfigManager;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "裁剪车间 WIP 导入与扎包系统";
