// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 配置层
// ==========================================
// 职责: 扎包参数与格式检测参数的加载和覆写
// 存储: JSON 配置文本 / 文件
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
