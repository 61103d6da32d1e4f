// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 对象 (key → 标量值), 未配置的键取内置默认值
// ==========================================

use crate::domain::bundle::{
    BundleOptions, DEFAULT_GARMENT_TYPE, DEFAULT_MAX_BUNDLE_SIZE, DEFAULT_MIN_BUNDLE_SIZE,
    DEFAULT_NAMING_FORMAT,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::format_detector::{
    DetectorConfig, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_SAMPLE_ROWS,
};
use anyhow::Context;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 空配置（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文本加载
    ///
    /// # 格式
    /// `{"bundle.max_size": 25, "bundle.garment_type": "polo"}`
    /// 值可为字符串、数字或布尔; 嵌套对象/数组视为格式错误
    pub fn from_json_str(content: &str) -> ImportResult<Self> {
        let root: Value = serde_json::from_str(content).map_err(|e| ImportError::ConfigReadError {
            key: "<root>".to_string(),
            message: e.to_string(),
        })?;

        let object = root.as_object().ok_or_else(|| ImportError::ConfigReadError {
            key: "<root>".to_string(),
            message: "配置必须为 JSON 对象".to_string(),
        })?;

        let mut values = BTreeMap::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                other => {
                    return Err(ImportError::ConfigValueError {
                        key: key.clone(),
                        value: other.to_string(),
                        message: "配置值必须为标量".to_string(),
                    })
                }
            };
            values.insert(key.clone(), text);
        }

        for key in values.keys() {
            if !config_keys::ALL.contains(&key.as_str()) {
                warn!(key = %key, "未知配置项, 已忽略");
            }
        }

        debug!(count = values.len(), "配置加载完成");
        Ok(Self { values })
    }

    /// 从 JSON 文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::from_json_str(&content)
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// 覆写配置值
    pub fn set_config_value(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    fn get_or_default<T>(&self, key: &str, default: T) -> ImportResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|e| ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn get_text_or_default(&self, key: &str, default: &str) -> String {
        match self.get_config_value(key).map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => default.to_string(),
        }
    }

    // ===== 扎包配置 =====

    pub fn get_garment_type(&self) -> String {
        self.get_text_or_default(config_keys::BUNDLE_GARMENT_TYPE, DEFAULT_GARMENT_TYPE)
    }

    pub fn get_max_bundle_size(&self) -> ImportResult<u32> {
        self.get_or_default(config_keys::BUNDLE_MAX_SIZE, DEFAULT_MAX_BUNDLE_SIZE)
    }

    pub fn get_min_bundle_size(&self) -> ImportResult<u32> {
        self.get_or_default(config_keys::BUNDLE_MIN_SIZE, DEFAULT_MIN_BUNDLE_SIZE)
    }

    pub fn get_naming_format(&self) -> String {
        self.get_text_or_default(config_keys::BUNDLE_NAMING_FORMAT, DEFAULT_NAMING_FORMAT)
    }

    /// 组装扎包参数
    pub fn get_bundle_options(&self) -> ImportResult<BundleOptions> {
        Ok(BundleOptions {
            garment_type: self.get_garment_type(),
            max_bundle_size: self.get_max_bundle_size()?,
            min_bundle_size: self.get_min_bundle_size()?,
            bundle_naming_format: self.get_naming_format(),
        })
    }

    // ===== 格式检测配置 =====

    /// 置信度阈值, 须在 [0, 1] 内
    pub fn get_confidence_threshold(&self) -> ImportResult<f64> {
        let value = self.get_or_default(
            config_keys::DETECTOR_CONFIDENCE_THRESHOLD,
            DEFAULT_CONFIDENCE_THRESHOLD,
        )?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ImportError::ConfigValueError {
                key: config_keys::DETECTOR_CONFIDENCE_THRESHOLD.to_string(),
                value: value.to_string(),
                message: "阈值须在 0 到 1 之间".to_string(),
            });
        }
        Ok(value)
    }

    pub fn get_sample_rows(&self) -> ImportResult<usize> {
        self.get_or_default(config_keys::DETECTOR_SAMPLE_ROWS, DEFAULT_SAMPLE_ROWS)
    }

    pub fn get_detector_config(&self) -> ImportResult<DetectorConfig> {
        Ok(DetectorConfig {
            confidence_threshold: self.get_confidence_threshold()?,
            sample_rows: self.get_sample_rows()?,
        })
    }

    /// 生效配置快照（JSON）
    ///
    /// 包含全部已知键的生效值（未配置的取默认值）以及额外的自定义键
    pub fn get_config_snapshot(&self) -> ImportResult<String> {
        let mut snapshot: BTreeMap<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), json!(v)))
            .collect();

        let options = self.get_bundle_options()?;
        let detector = self.get_detector_config()?;
        snapshot.insert(config_keys::BUNDLE_GARMENT_TYPE.to_string(), json!(options.garment_type));
        snapshot.insert(config_keys::BUNDLE_MAX_SIZE.to_string(), json!(options.max_bundle_size));
        snapshot.insert(config_keys::BUNDLE_MIN_SIZE.to_string(), json!(options.min_bundle_size));
        snapshot.insert(
            config_keys::BUNDLE_NAMING_FORMAT.to_string(),
            json!(options.bundle_naming_format),
        );
        snapshot.insert(
            config_keys::DETECTOR_CONFIDENCE_THRESHOLD.to_string(),
            json!(detector.confidence_threshold),
        );
        snapshot.insert(
            config_keys::DETECTOR_SAMPLE_ROWS.to_string(),
            json!(detector.sample_rows),
        );

        serde_json::to_string(&snapshot).map_err(|e| ImportError::InternalError(e.to_string()))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 扎包
    pub const BUNDLE_GARMENT_TYPE: &str = "bundle.garment_type";
    pub const BUNDLE_MAX_SIZE: &str = "bundle.max_size";
    pub const BUNDLE_MIN_SIZE: &str = "bundle.min_size";
    pub const BUNDLE_NAMING_FORMAT: &str = "bundle.naming_format";

    // 格式检测
    pub const DETECTOR_CONFIDENCE_THRESHOLD: &str = "detector.confidence_threshold";
    pub const DETECTOR_SAMPLE_ROWS: &str = "detector.sample_rows";

    pub const ALL: [&str; 6] = [
        BUNDLE_GARMENT_TYPE,
        BUNDLE_MAX_SIZE,
        BUNDLE_MIN_SIZE,
        BUNDLE_NAMING_FORMAT,
        DETECTOR_CONFIDENCE_THRESHOLD,
        DETECTOR_SAMPLE_ROWS,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = ConfigManager::new();
        assert_eq!(config.get_bundle_options().unwrap(), BundleOptions::default());
        assert_eq!(config.get_detector_config().unwrap(), DetectorConfig::default());
    }

    #[test]
    fn test_from_json_str_mixed_scalars() {
        let config = ConfigManager::from_json_str(
            r#"{"bundle.max_size": 25, "bundle.min_size": "10", "bundle.garment_type": "polo", "detector.sample_rows": 8}"#,
        )
        .unwrap();

        let options = config.get_bundle_options().unwrap();
        assert_eq!(options.max_bundle_size, 25);
        assert_eq!(options.min_bundle_size, 10);
        assert_eq!(options.garment_type, "polo");
        assert_eq!(config.get_sample_rows().unwrap(), 8);
    }

    #[test]
    fn test_invalid_value_reports_key() {
        let config = ConfigManager::from_json_str(r#"{"bundle.max_size": "thirty"}"#).unwrap();
        match config.get_max_bundle_size() {
            Err(ImportError::ConfigValueError { key, value, .. }) => {
                assert_eq!(key, config_keys::BUNDLE_MAX_SIZE);
                assert_eq!(value, "thirty");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config =
            ConfigManager::from_json_str(r#"{"detector.confidence_threshold": 1.5}"#).unwrap();
        assert!(config.get_confidence_threshold().is_err());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            ConfigManager::from_json_str("[1, 2]"),
            Err(ImportError::ConfigReadError { .. })
        ));
        assert!(matches!(
            ConfigManager::from_json_str(r#"{"bundle.max_size": [30]}"#),
            Err(ImportError::ConfigValueError { .. })
        ));
    }

    #[test]
    fn test_snapshot_contains_effective_values() {
        let mut config = ConfigManager::new();
        config.set_config_value(config_keys::BUNDLE_MAX_SIZE, "20");

        let snapshot: BTreeMap<String, Value> =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot[config_keys::BUNDLE_MAX_SIZE], json!(20));
        assert_eq!(snapshot[config_keys::BUNDLE_MIN_SIZE], json!(15));
        assert_eq!(snapshot[config_keys::BUNDLE_GARMENT_TYPE], json!("tshirt"));
    }
}
