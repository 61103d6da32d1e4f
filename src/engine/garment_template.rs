// ==========================================
// 裁剪车间 WIP 导入与扎包系统 - 款式模板
// ==========================================
// 职责: 每种款式的裁片清单、工序路线、各尺码单耗
// 红线: 模板为不可变静态表, 只读访问
// ==========================================

use crate::domain::bundle::{PartSpec, ProcessStep, DEFAULT_GARMENT_TYPE};
use crate::domain::types::MachineType;
use crate::importer::data_cleaner::normalize_size;

/// 未收录尺码的默认单耗（米/件）
pub const DEFAULT_FABRIC_RATE: f64 = 0.25;

pub struct PartTemplate {
    pub name: &'static str,
    pub quantity_per_garment: u32,
}

pub struct OperationTemplate {
    pub operation: &'static str,
    pub machine_type: MachineType,
    pub rate: f64,
    pub time_minutes: f64,
}

// ==========================================
// GarmentTemplate - 款式模板
// ==========================================
pub struct GarmentTemplate {
    pub garment_type: &'static str,
    pub parts: &'static [PartTemplate],
    pub operations: &'static [OperationTemplate],
    pub fabric_rates: &'static [(&'static str, f64)],
}

const fn part(name: &'static str, quantity_per_garment: u32) -> PartTemplate {
    PartTemplate {
        name,
        quantity_per_garment,
    }
}

const fn op(
    operation: &'static str,
    machine_type: MachineType,
    rate: f64,
    time_minutes: f64,
) -> OperationTemplate {
    OperationTemplate {
        operation,
        machine_type,
        rate,
        time_minutes,
    }
}

static TSHIRT: GarmentTemplate = GarmentTemplate {
    garment_type: "tshirt",
    parts: &[
        part("Front", 1),
        part("Back", 1),
        part("Sleeve", 2),
        part("Neck Rib", 1),
    ],
    operations: &[
        op("Shoulder Join", MachineType::Overlock, 0.50, 0.6),
        op("Neck Rib Attach", MachineType::Overlock, 0.80, 1.0),
        op("Sleeve Attach", MachineType::Overlock, 1.00, 1.2),
        op("Side Seam", MachineType::Overlock, 1.00, 1.4),
        op("Sleeve Hem", MachineType::Flatlock, 0.60, 0.8),
        op("Bottom Hem", MachineType::Flatlock, 0.60, 0.8),
        op("Final Inspection", MachineType::Inspection, 0.30, 0.5),
    ],
    fabric_rates: &[
        ("XS", 0.20),
        ("S", 0.22),
        ("M", 0.25),
        ("L", 0.28),
        ("XL", 0.30),
        ("XXL", 0.33),
    ],
};

static POLO: GarmentTemplate = GarmentTemplate {
    garment_type: "polo",
    parts: &[
        part("Front", 1),
        part("Back", 1),
        part("Sleeve", 2),
        part("Collar", 1),
        part("Placket", 1),
    ],
    operations: &[
        op("Placket Attach", MachineType::SingleNeedle, 1.20, 1.5),
        op("Shoulder Join", MachineType::Overlock, 0.50, 0.6),
        op("Collar Attach", MachineType::SingleNeedle, 1.50, 1.8),
        op("Sleeve Attach", MachineType::Overlock, 1.00, 1.2),
        op("Side Seam", MachineType::Overlock, 1.00, 1.4),
        op("Bottom Hem", MachineType::Flatlock, 0.60, 0.8),
        op("Buttonhole", MachineType::Buttonhole, 0.40, 0.5),
        op("Final Inspection", MachineType::Inspection, 0.30, 0.5),
    ],
    fabric_rates: &[
        ("XS", 0.24),
        ("S", 0.26),
        ("M", 0.29),
        ("L", 0.32),
        ("XL", 0.35),
        ("XXL", 0.38),
    ],
};

static SHIRT: GarmentTemplate = GarmentTemplate {
    garment_type: "shirt",
    parts: &[
        part("Front", 2),
        part("Back", 1),
        part("Yoke", 2),
        part("Sleeve", 2),
        part("Collar", 2),
        part("Cuff", 2),
    ],
    operations: &[
        op("Yoke Attach", MachineType::SingleNeedle, 1.00, 1.2),
        op("Front Placket", MachineType::DoubleNeedle, 1.20, 1.4),
        op("Collar Make", MachineType::SingleNeedle, 1.50, 2.0),
        op("Collar Attach", MachineType::SingleNeedle, 1.50, 1.8),
        op("Sleeve Attach", MachineType::SingleNeedle, 1.20, 1.5),
        op("Side Seam", MachineType::Overlock, 1.00, 1.4),
        op("Cuff Attach", MachineType::SingleNeedle, 1.20, 1.5),
        op("Buttonhole", MachineType::Buttonhole, 0.60, 0.8),
        op("Pressing", MachineType::Pressing, 0.50, 0.7),
        op("Final Inspection", MachineType::Inspection, 0.30, 0.5),
    ],
    fabric_rates: &[
        ("S", 1.40),
        ("M", 1.50),
        ("L", 1.60),
        ("XL", 1.70),
        ("XXL", 1.80),
    ],
};

static TROUSER: GarmentTemplate = GarmentTemplate {
    garment_type: "trouser",
    parts: &[
        part("Front", 2),
        part("Back", 2),
        part("Waistband", 1),
        part("Pocket", 4),
    ],
    operations: &[
        op("Pocket Attach", MachineType::SingleNeedle, 1.50, 2.0),
        op("Fly Stitch", MachineType::SingleNeedle, 1.20, 1.5),
        op("Side Seam", MachineType::Overlock, 1.00, 1.4),
        op("Inseam", MachineType::Overlock, 1.00, 1.4),
        op("Waistband Attach", MachineType::Kansai, 1.50, 1.8),
        op("Bottom Hem", MachineType::SingleNeedle, 0.60, 0.8),
        op("Pressing", MachineType::Pressing, 0.60, 0.8),
        op("Final Inspection", MachineType::Inspection, 0.30, 0.5),
    ],
    fabric_rates: &[
        ("28", 1.10),
        ("30", 1.15),
        ("32", 1.20),
        ("34", 1.25),
        ("36", 1.30),
        ("38", 1.35),
        ("40", 1.40),
    ],
};

static KURTA: GarmentTemplate = GarmentTemplate {
    garment_type: "kurta",
    parts: &[
        part("Front", 1),
        part("Back", 1),
        part("Sleeve", 2),
        part("Placket", 1),
    ],
    operations: &[
        op("Placket Attach", MachineType::SingleNeedle, 1.20, 1.5),
        op("Shoulder Join", MachineType::SingleNeedle, 0.60, 0.8),
        op("Sleeve Attach", MachineType::SingleNeedle, 1.20, 1.5),
        op("Side Seam", MachineType::Overlock, 1.20, 1.6),
        op("Bottom Hem", MachineType::SingleNeedle, 0.80, 1.0),
        op("Buttonhole", MachineType::Buttonhole, 0.40, 0.5),
        op("Pressing", MachineType::Pressing, 0.50, 0.7),
        op("Final Inspection", MachineType::Inspection, 0.30, 0.5),
    ],
    fabric_rates: &[
        ("S", 2.20),
        ("M", 2.40),
        ("L", 2.60),
        ("XL", 2.80),
        ("XXL", 3.00),
    ],
};

static TEMPLATES: [&GarmentTemplate; 5] = [&TSHIRT, &POLO, &SHIRT, &TROUSER, &KURTA];

impl GarmentTemplate {
    /// 全部内置款式
    pub fn all() -> &'static [&'static GarmentTemplate] {
        &TEMPLATES
    }

    /// 按款式名查找（忽略大小写与分隔符, "T-Shirt" 与 "tshirt" 等价）
    pub fn lookup(garment_type: &str) -> Option<&'static GarmentTemplate> {
        let key: String = garment_type
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        TEMPLATES.iter().copied().find(|t| t.garment_type == key)
    }

    /// 查找模板, 未收录时回退到 tshirt
    ///
    /// # 返回
    /// - (模板, 是否回退)
    pub fn resolve(garment_type: &str) -> (&'static GarmentTemplate, bool) {
        match Self::lookup(garment_type) {
            Some(template) => (template, false),
            None => {
                tracing::warn!(garment_type, fallback = DEFAULT_GARMENT_TYPE, "未收录款式, 使用默认模板");
                (&TSHIRT, true)
            }
        }
    }

    /// 尺码单耗（未收录尺码取默认值）
    pub fn fabric_rate(&self, size: &str) -> f64 {
        let size = normalize_size(size);
        self.fabric_rates
            .iter()
            .find(|(label, _)| *label == size)
            .map(|(_, rate)| *rate)
            .unwrap_or(DEFAULT_FABRIC_RATE)
    }

    /// 按成衣件数展开裁片
    pub fn parts_for(&self, garment_count: u32) -> Vec<PartSpec> {
        self.parts
            .iter()
            .map(|p| PartSpec {
                name: p.name.to_string(),
                quantity_per_garment: p.quantity_per_garment,
                total_quantity: p.quantity_per_garment.saturating_mul(garment_count),
            })
            .collect()
    }

    /// 工序路线（step_index 从 1 开始）
    pub fn process_steps(&self) -> Vec<ProcessStep> {
        self.operations
            .iter()
            .enumerate()
            .map(|(idx, o)| ProcessStep {
                step_index: idx as u32 + 1,
                operation: o.operation.to_string(),
                machine_type: o.machine_type.clone(),
                rate: o.rate,
                time_minutes: o.time_minutes,
            })
            .collect()
    }

    /// 单件标准工时合计（分钟）
    pub fn time_per_garment(&self) -> f64 {
        self.operations.iter().map(|o| o.time_minutes).sum()
    }

    /// 单件工价合计
    pub fn rate_per_garment(&self) -> f64 {
        self.operations.iter().map(|o| o.rate).sum()
    }
}
