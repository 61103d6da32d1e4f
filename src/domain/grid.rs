// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 原始表格
// ==========================================
// 用途: 外部已读取的表格文本（第 0 行为表头）
// 生命周期: 仅在单次解析调用内
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RawGrid - 原始文本表格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// 从字符串切片构造（测试与调用方便捷入口）
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| c.as_ref().to_string()).collect())
                .collect(),
        }
    }

    /// 表格规整化：短行以空字符串补齐到最大列宽
    ///
    /// 解析器只处理规整化后的表格, 不依赖越界读取
    pub fn normalized(&self) -> Self {
        let width = self.width();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut padded = row.clone();
                padded.resize(width, String::new());
                padded
            })
            .collect();
        Self { rows }
    }

    pub fn is_rectangular(&self) -> bool {
        let width = self.width();
        self.rows.iter().all(|r| r.len() == width)
    }

    /// 最大列宽
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn headers(&self) -> &[String] {
        self.rows.first().map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// 数据行（不含表头）
    pub fn data_rows(&self) -> &[Vec<String>] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }

    /// 采样数据行：前 min(limit, 行数-1) 行
    pub fn sample_rows(&self, limit: usize) -> &[Vec<String>] {
        let data = self.data_rows();
        &data[..data.len().min(limit)]
    }

    /// 读取单元格（缺失视为空字符串）
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}

/// 读取行内单元格（缺失视为空字符串）
pub fn row_cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|s| s.as_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_pads_short_rows() {
        let grid = RawGrid::from_rows(vec![vec!["Color", "S", "M"], vec!["Red", "5"]]);
        assert!(!grid.is_rectangular());

        let normalized = grid.normalized();
        assert!(normalized.is_rectangular());
        assert_eq!(normalized.rows()[1], vec!["Red", "5", ""]);
    }

    #[test]
    fn test_sample_rows_bounded() {
        let grid = RawGrid::from_rows(vec![vec!["h"], vec!["1"], vec!["2"]]);
        assert_eq!(grid.sample_rows(5).len(), 2);
        assert_eq!(grid.sample_rows(1).len(), 1);
        assert_eq!(RawGrid::default().sample_rows(5).len(), 0);
    }

    #[test]
    fn test_cell_out_of_bounds_is_empty() {
        let grid = RawGrid::from_rows(vec![vec!["a"]]);
        assert_eq!(grid.cell(0, 0), "a");
        assert_eq!(grid.cell(0, 3), "");
        assert_eq!(grid.cell(9, 0), "");
    }
}
