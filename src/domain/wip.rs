// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - WIP 数据集模型
// ==========================================
// 用途: 颜色 × 尺码 件数规范模型（解析器输出, 扎包输入）
// 不变量: total == Σ pieces_by_size; total_pieces == Σ colors.total
// ==========================================

use crate::domain::types::{FormatType, ParseStrategy};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// SizeBreakdown - 尺码件数（保持首次出现顺序）
// ==========================================
// 序列化为 JSON 对象, 键唯一
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeBreakdown {
    entries: Vec<(String, u32)>,
}

impl SizeBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加件数（同尺码合并）
    pub fn add(&mut self, size: &str, pieces: u32) {
        match self.entries.iter_mut().find(|(s, _)| s == size) {
            Some((_, existing)) => *existing = existing.saturating_add(pieces),
            None => self.entries.push((size.to_string(), pieces)),
        }
    }

    pub fn get(&self, size: &str) -> Option<u32> {
        self.entries.iter().find(|(s, _)| s == size).map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(s, p)| (s.as_str(), *p))
    }

    pub fn sizes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn total(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |acc, (_, p)| acc.saturating_add(*p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u32)> for SizeBreakdown {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut breakdown = SizeBreakdown::new();
        for (size, pieces) in iter {
            breakdown.add(size.as_ref(), pieces);
        }
        breakdown
    }
}

impl Serialize for SizeBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (size, pieces) in &self.entries {
            map.serialize_entry(size, pieces)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SizeBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor;

        impl<'de> Visitor<'de> for BreakdownVisitor {
            type Value = SizeBreakdown;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map of size label to piece count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut breakdown = SizeBreakdown::new();
                while let Some((size, pieces)) = access.next_entry::<String, u32>()? {
                    breakdown.add(&size, pieces);
                }
                Ok(breakdown)
            }
        }

        deserializer.deserialize_map(BreakdownVisitor)
    }
}

// ==========================================
// ColorEntry - 单色件数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorEntry {
    pub name: String,
    pub pieces_by_size: SizeBreakdown,
    pub total: u32,
    pub layers: u32,
    pub pieces_per_layer: u32,
}

impl ColorEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pieces_by_size: SizeBreakdown::new(),
            total: 0,
            layers: 0,
            pieces_per_layer: 0,
        }
    }

    pub fn add_pieces(&mut self, size: &str, pieces: u32) {
        self.pieces_by_size.add(size, pieces);
        self.total = self.pieces_by_size.total();
    }

    /// 重新计算合计与每层件数
    pub fn refresh_totals(&mut self) {
        self.total = self.pieces_by_size.total();
        self.pieces_per_layer = if self.layers > 0 {
            self.total / self.layers
        } else {
            0
        };
    }
}

// ==========================================
// WipDataset - 规范化 WIP 数据集
// ==========================================
// 不含批次号/时间戳: 同一表格重复解析结果完全一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WipDataset {
    pub format: FormatType,
    pub strategy: ParseStrategy,
    pub colors: Vec<ColorEntry>,
    pub total_pieces: u32,
    pub metadata: BTreeMap<String, String>,
}

impl WipDataset {
    pub fn new(
        format: FormatType,
        strategy: ParseStrategy,
        colors: Vec<ColorEntry>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        let total_pieces = colors
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.total));
        Self {
            format,
            strategy,
            colors,
            total_pieces,
            metadata,
        }
    }

    pub fn color(&self, name: &str) -> Option<&ColorEntry> {
        self.colors.iter().find(|c| c.name == name)
    }

    /// 去重后的尺码列表（首次出现顺序）
    pub fn size_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for color in &self.colors {
            for size in color.pieces_by_size.sizes() {
                if !labels.iter().any(|l| l == size) {
                    labels.push(size.to_string());
                }
            }
        }
        labels
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }
}

// ==========================================
// DatasetStatistics - 导入统计
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatistics {
    pub total_colors: usize,
    pub total_sizes: usize,
    pub total_pieces: u32,
    pub average_pieces_per_color: f64,
    pub estimated_bundles: u32,
    pub format: FormatType,
}

impl DatasetStatistics {
    /// 统计数据集
    ///
    /// # 规则
    /// - average_pieces_per_color 保留两位小数
    /// - estimated_bundles = Σ ceil(尺码件数 / max_bundle_size)
    pub fn from_dataset(dataset: &WipDataset, max_bundle_size: u32) -> Self {
        let total_colors = dataset.colors.len();
        let average = if total_colors == 0 {
            0.0
        } else {
            dataset.total_pieces as f64 / total_colors as f64
        };
        let max = max_bundle_size.max(1);
        let estimated_bundles = dataset
            .colors
            .iter()
            .flat_map(|c| c.pieces_by_size.iter())
            .map(|(_, pieces)| pieces.div_ceil(max))
            .fold(0u32, u32::saturating_add);

        Self {
            total_colors,
            total_sizes: dataset.size_labels().len(),
            total_pieces: dataset.total_pieces,
            average_pieces_per_color: (average * 100.0).round() / 100.0,
            estimated_bundles,
            format: dataset.format,
        }
    }
}

// ==========================================
// ValidationReport - 结构校验结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub is_valid: bool,
}

impl ValidationReport {
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        let is_valid = errors.is_empty();
        Self {
            errors,
            warnings,
            is_valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_breakdown_merges_and_keeps_order() {
        let mut sizes = SizeBreakdown::new();
        sizes.add("M", 5);
        sizes.add("S", 3);
        sizes.add("M", 2);

        let collected: Vec<_> = sizes.iter().collect();
        assert_eq!(collected, vec![("M", 7), ("S", 3)]);
        assert_eq!(sizes.total(), 10);
    }

    #[test]
    fn test_size_breakdown_json_object() {
        let sizes: SizeBreakdown = vec![("XS", 10), ("S", 20)].into_iter().collect();
        let json = serde_json::to_string(&sizes).unwrap();
        assert_eq!(json, r#"{"XS":10,"S":20}"#);

        let back: SizeBreakdown = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sizes);
    }

    #[test]
    fn test_dataset_totals_and_statistics() {
        let mut red = ColorEntry::new("Red");
        red.add_pieces("S", 40);
        red.add_pieces("M", 25);
        let mut blue = ColorEntry::new("Blue");
        blue.add_pieces("S", 15);

        let dataset = WipDataset::new(
            FormatType::SizeColorMatrix,
            ParseStrategy::Horizontal,
            vec![red, blue],
            BTreeMap::new(),
        );
        assert_eq!(dataset.total_pieces, 80);
        assert_eq!(dataset.size_labels(), vec!["S", "M"]);

        let stats = DatasetStatistics::from_dataset(&dataset, 30);
        assert_eq!(stats.total_colors, 2);
        assert_eq!(stats.total_sizes, 2);
        assert_eq!(stats.average_pieces_per_color, 40.0);
        // S:40 → 2, M:25 → 1, S:15 → 1
        assert_eq!(stats.estimated_bundles, 4);
    }

    #[test]
    fn test_validation_report_validity() {
        assert!(ValidationReport::new(vec![], vec!["w".into()]).is_valid);
        assert!(!ValidationReport::new(vec!["e".into()], vec![]).is_valid);
    }
}
