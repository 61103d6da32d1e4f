// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的表格构造、导入器构造、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use garment_wip::domain::{ColorEntry, Operator, RawGrid, WorkItem};
use garment_wip::importer::{ImportOutcome, WipImporter, WipImporterImpl};

/// 从字符串切片构造表格
pub fn grid(rows: &[&[&str]]) -> RawGrid {
    RawGrid::from_rows(rows.iter().map(|r| r.iter().copied()))
}

/// 默认参数导入器
pub fn create_test_importer() -> WipImporterImpl {
    WipImporterImpl::default()
}

/// 导入表格（失败即 panic）
pub fn import_rows(rows: &[&[&str]]) -> ImportOutcome {
    create_test_importer()
        .import(&grid(rows))
        .expect("import should succeed")
}

/// 裁剪单样例: 两色四码, 带批号/款号/层数
pub fn cutting_sheet_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["Lot No", "Article", "Color", "Layers", "S", "M", "L", "XL"],
        vec!["LOT-42", "TS-100", "Navy", "20", "40", "60", "60", "40"],
        vec!["LOT-42", "TS-100", "Maroon", "10", "20", "30", "30", "20"],
    ]
}

pub fn as_slices<'a>(rows: &'a [Vec<&'a str>]) -> Vec<&'a [&'a str]> {
    rows.iter().map(|r| r.as_slice()).collect()
}

/// 构造颜色条目
pub fn create_test_color(name: &str, sizes: &[(&str, u32)], layers: u32) -> ColorEntry {
    let mut color = ColorEntry::new(name);
    for (size, pieces) in sizes {
        color.add_pieces(size, *pieces);
    }
    color.layers = layers;
    color.refresh_totals();
    color
}

pub fn create_test_operator(id: &str, machine: Option<&str>) -> Operator {
    Operator {
        id: id.to_string(),
        name: format!("Operator {}", id),
        machine: machine.map(str::to_string),
        status: "available".to_string(),
        current_load: 0,
        max_load: 4,
    }
}

pub fn create_test_work_item(id: &str, machine: Option<&str>) -> WorkItem {
    WorkItem {
        id: id.to_string(),
        operation: "Side Seam".to_string(),
        machine_type: machine.map(str::to_string),
        piece_count: 30,
    }
}
