// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 导入层
// ==========================================
// 职责: 外部表格导入, 生成规范 WIP 数据集
// 流程: 列角色识别 → 格式检测 → 策略解析 → 结构校验
// 支持: 已读取的文本表格 / CSV
// ==========================================

// 模块声明
pub mod column_classifier;
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod file_parser;
pub mod format_detector;
pub mod format_parser;
pub mod wip_importer;
pub mod wip_importer_trait;

// 重导出核心类型
pub use column_classifier::{ColumnClassifier, ColumnRoles, SizeColumn, SizeVocabulary};
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use file_parser::CsvGridParser;
pub use format_detector::{DetectionReport, DetectorConfig, FormatCandidate, FormatDetector};
pub use format_parser::{parse_grid, select_strategy, MIXED_SIZE};
pub use wip_importer::{ImportOutcome, WipImporterImpl};

// 重导出 Trait 接口
pub use wip_importer_trait::{DataCleaner, DqValidator, FormatParser, WipImporter};
